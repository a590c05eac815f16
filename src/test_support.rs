use std::net::{SocketAddr, TcpListener};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

/// Serves `router` on an ephemeral local port and returns its base url.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
    let address = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(router.into_make_service());
    tokio::spawn(server);
    format!("http://{}", address)
}

pub async fn read_body(response: Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn read_json(response: Response) -> Value {
    serde_json::from_str(&read_body(response).await).unwrap()
}
