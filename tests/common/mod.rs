//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::Router;
use tokio::net::TcpListener;

use query_gateway::lifecycle::startup;
use query_gateway::{GatewayConfig, HttpServer, Shutdown};

/// One request observed by the mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
}

/// Start a mock upstream that records every request it receives.
pub async fn start_capture_upstream(addr: SocketAddr) -> Arc<Mutex<Vec<CapturedRequest>>> {
    let captured: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let sink = sink.clone();
        async move {
            sink.lock().unwrap().push(CapturedRequest {
                path: request.uri().path().to_string(),
                headers: request.headers().clone(),
            });
            "ok"
        }
    });

    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    captured
}

/// Build the pipelines from config and run the gateway in the background.
///
/// The listener is bound before this returns, so tests can connect
/// immediately. The returned coordinator stops the server.
pub async fn start_gateway(config: GatewayConfig) -> Shutdown {
    let filter = Arc::new(startup::build_authentication_filter(&config).unwrap());
    let injector = Arc::new(startup::build_header_injector(&config));

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let server = HttpServer::new(config, filter, injector).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    shutdown
}
