use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::warn;
use crate::clients::calendar_client::CalendarClient;
use crate::controller::AppState;
use crate::helpers::relay_error::{error_response, RelayError};

pub fn router(app_state: AppState) -> Router {
    let calendar_client = Arc::new(CalendarClient::new(
        app_state.http_client,
        &app_state.config,
    ));

    Router::new()
        .route("/booked-dates", get(retrieve_booked_dates))
        .route_layer(Extension(calendar_client))
}

/// Every event of the iCal feed as a `Réservé` range, or nothing at all.
pub async fn retrieve_booked_dates(
    Extension(calendar_client): Extension<Arc<CalendarClient>>,
) -> impl IntoResponse {
    let booked_dates_res = calendar_client.fetch_booked_dates().await;

    return match booked_dates_res {
        Ok(booked_dates) => {
            (StatusCode::OK, Json(booked_dates)).into_response()
        }
        Err(RelayError::Calendar(e)) => {
            warn!("Something went wrong parsing the iCal feed due to: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to parse calendar")
        }
        Err(e) => {
            warn!("Something went wrong fetching the iCal feed due to: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to parse calendar")
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use crate::config::Config;
    use crate::controller::application;
    use crate::test_support::{read_json, spawn_upstream};

    async fn serve_feed(status: StatusCode, feed: &'static str) -> String {
        let upstream = Router::new().route(
            "/calendar.ics",
            get(move || async move { (status, feed) }),
        );
        format!("{}/calendar.ics", spawn_upstream(upstream).await)
    }

    async fn booked_dates(config: Config) -> axum::response::Response {
        application(AppState::new(config))
            .oneshot(Request::get("/api/booked-dates").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn config_for(ical_url: String) -> Config {
        Config {
            ical_url: Some(ical_url),
            ..Config::for_tests()
        }
    }

    #[tokio::test]
    async fn test_every_event_becomes_a_booked_range() {
        let feed = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
DTSTART;VALUE=DATE:20240701\r\n\
DTEND;VALUE=DATE:20240708\r\n\
SUMMARY:Camille Martin\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20240810T150000Z\r\n\
DTEND:20240817T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let url = serve_feed(StatusCode::OK, feed).await;

        let response = booked_dates(config_for(url)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!([
                {
                    "start": "2024-07-01T00:00:00.000Z",
                    "end": "2024-07-08T00:00:00.000Z",
                    "title": "Réservé",
                },
                {
                    "start": "2024-08-10T15:00:00.000Z",
                    "end": "2024-08-17T10:00:00.000Z",
                    "title": "Réservé",
                },
            ])
        );
    }

    #[tokio::test]
    async fn test_feed_without_events_is_empty_list() {
        let url = serve_feed(StatusCode::OK, "BEGIN:VCALENDAR\nVERSION:2.0\nEND:VCALENDAR\n").await;

        let response = booked_dates(config_for(url)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_unreachable_feed_fails() {
        let response = booked_dates(Config::for_tests()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await, json!({ "error": "Failed to parse calendar" }));
    }

    #[tokio::test]
    async fn test_malformed_feed_fails_without_partial_results() {
        let feed = "BEGIN:VCALENDAR\n\
BEGIN:VEVENT\n\
DTSTART:20240701\n\
DTEND:20240708\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART:20240801\n\
END:VEVENT\n\
END:VCALENDAR\n";
        let url = serve_feed(StatusCode::OK, feed).await;

        let response = booked_dates(config_for(url)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await, json!({ "error": "Failed to parse calendar" }));
    }

    #[tokio::test]
    async fn test_feed_error_status_fails() {
        let url = serve_feed(StatusCode::NOT_FOUND, "BEGIN:VCALENDAR\nEND:VCALENDAR\n").await;

        let response = booked_dates(config_for(url)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_feed_url_fails() {
        let config = Config {
            ical_url: None,
            ..Config::for_tests()
        };

        let response = booked_dates(config).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await, json!({ "error": "Failed to parse calendar" }));
    }
}
