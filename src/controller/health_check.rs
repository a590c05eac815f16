use axum::routing::get;
use axum::Router;

pub fn router() -> Router {
    Router::new().route("/ping", get(get_ping))
}

/// Liveness check for the hosting platform
async fn get_ping() -> &'static str {
    "pong"
}
