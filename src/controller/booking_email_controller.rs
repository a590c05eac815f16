use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::json;
use tracing::warn;
use crate::clients::email_client::EmailClient;
use crate::controller::AppState;
use crate::helpers::relay_error::{error_response, RelayError};
use crate::models::booking_email::BookingEmailRequest;

pub fn router(app_state: AppState) -> Router {
    let email_client = Arc::new(EmailClient::new(
        app_state.http_client,
        &app_state.config,
    ));

    Router::new()
        .route("/send-booking-email", post(send_booking_email))
        .route_layer(Extension(email_client))
}

pub async fn send_booking_email(
    Extension(email_client): Extension<Arc<EmailClient>>,
    body: Result<Json<BookingEmailRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(booking) = match body {
        Ok(body) => body,
        Err(e) => {
            warn!("Cannot read booking email request body: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email");
        }
    };

    let send_res = notify_admin(&email_client, &booking).await;

    return match send_res {
        Ok(_) => {
            (StatusCode::OK, Json(json!({ "message": "Email envoyé avec succès" }))).into_response()
        }
        Err(e) => {
            warn!("Something went wrong sending the booking email due to: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email")
        }
    };
}

async fn notify_admin(
    email_client: &EmailClient,
    booking: &BookingEmailRequest,
) -> Result<(), RelayError> {
    let message = booking.to_notification()?;
    email_client.send_to_admin(&message).await
}
