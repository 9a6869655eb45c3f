//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (tracing, timeout, request ID, authentication)
//! - Decide per request whether the transport counts as secure
//! - Render authentication rejections as 401 responses
//! - Forward accepted requests to the upstream
//!
//! # Design Decisions
//! - The authentication filter runs as the innermost layer, so tracing and
//!   timeouts cover it, and handlers only ever see accepted requests
//! - The established principal rides in request extensions for downstream
//!   consumers
//! - A request is secure when the listener terminates TLS, or when the
//!   deployment trusts `X-Forwarded-Proto` from a fronting load balancer

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::client::{ClientSideHeaderInjector, UpstreamClient};
use crate::config::GatewayConfig;
use crate::filter::{AuthenticationFilter, FilterDecision};
use crate::http::request::RequestIdLayer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub filter: Arc<AuthenticationFilter>,
    pub injector: Arc<ClientSideHeaderInjector>,
    pub upstream: UpstreamClient,
    pub transport_secure: bool,
    pub trust_forwarded_proto: bool,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and pipelines.
    pub fn new(
        config: GatewayConfig,
        filter: Arc<AuthenticationFilter>,
        injector: Arc<ClientSideHeaderInjector>,
    ) -> Result<Self, crate::config::ConfigurationError> {
        let upstream = UpstreamClient::new(&config.upstream.address)?;

        let state = AppState {
            filter,
            injector,
            upstream,
            transport_secure: config.listener.tls.is_some(),
            trust_forwarded_proto: config.security.trust_forwarded_proto,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(
                state,
                authentication_middleware,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting plaintext connections on the listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.signalled().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS termination.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls_config: RustlsConfig,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let graceful = handle.clone();
        tokio::spawn(async move {
            shutdown.signalled().await;
            tracing::info!("Shutdown signal received");
            graceful.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Decide whether a request arrived over an encrypted transport.
fn request_is_secure(
    request: &Request<Body>,
    transport_secure: bool,
    trust_forwarded_proto: bool,
) -> bool {
    if transport_secure {
        return true;
    }
    if trust_forwarded_proto {
        return request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .map(|proto| proto.eq_ignore_ascii_case("https"))
            .unwrap_or(false);
    }
    false
}

/// Middleware running the authentication filter in front of every route.
pub async fn authentication_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let secure = request_is_secure(
        &request,
        state.transport_secure,
        state.trust_forwarded_proto,
    );

    match state.filter.process(request, secure).await {
        FilterDecision::Augmented { request, principal } => {
            let mut request = request.into_inner();
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        FilterDecision::Passthrough {
            mut request,
            principal,
        } => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        FilterDecision::Rejected(err) => {
            tracing::warn!(error = %err, "Rejecting unauthenticated request");
            let mut response = (StatusCode::UNAUTHORIZED, err.to_string()).into_response();
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
            response
        }
    }
}

/// Forward an accepted request to the upstream.
async fn gateway_handler(State(state): State<AppState>, mut request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // Outbound pipeline: unconditional, no eligibility gate.
    state.injector.decorate(request.headers_mut());

    match state.upstream.forward(request).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method, status.as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(&method, 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
