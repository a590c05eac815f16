use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use tracing::warn;
use crate::clients::smoobu_client::{SmoobuClient, UpstreamResponse};
use crate::controller::AppState;
use crate::helpers::relay_error::{error_response, RelayError};
use crate::models::reservation::ReservationRequest;

pub fn router(app_state: AppState) -> Router {
    let smoobu_client = Arc::new(SmoobuClient::new(
        app_state.http_client,
        &app_state.config,
    ));

    Router::new()
        .route("/reservations", post(create_reservation))
        .route_layer(Extension(smoobu_client))
}

pub async fn create_reservation(
    Extension(smoobu_client): Extension<Arc<SmoobuClient>>,
    body: Result<Json<ReservationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(reservation) = match body {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected reservation request body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let forward_res = forward(&smoobu_client, reservation).await;

    return match forward_res {
        Ok(upstream) => {
            (upstream.status, Json(upstream.body)).into_response()
        }
        Err(e) => {
            warn!("Something went wrong forwarding reservation to Smoobu due to: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };
}

async fn forward(
    smoobu_client: &SmoobuClient,
    reservation: ReservationRequest,
) -> Result<UpstreamResponse, RelayError> {
    let payload = reservation.into_upstream_payload(smoobu_client.property_id());
    smoobu_client.create_reservation(&payload).await
}
