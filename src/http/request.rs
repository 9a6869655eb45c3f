//! Request views and transformation.
//!
//! # Responsibilities
//! - Read-only request view handed to authenticators and the eligibility gate
//! - Wrap an accepted request with its frozen header overlay
//! - Generate unique request ID (UUID v4) for tracing
//!
//! # Design Decisions
//! - The view exposes exactly what the pipeline may read: header
//!   names/values, the path, and the transport's security
//! - Original headers are never mutated; the overlay only introduces names
//!   the base request lacks
//! - Request ID added as early as possible for tracing

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue};
use axum::http::Request;
use tower::{Layer, Service};
use uuid::Uuid;

use crate::modifier::HeaderOverlay;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Read-only view of an inbound request.
pub struct RequestView<'a> {
    headers: &'a HeaderMap,
    path: &'a str,
    secure: bool,
}

impl<'a> RequestView<'a> {
    pub fn new(headers: &'a HeaderMap, path: &'a str, secure: bool) -> Self {
        Self {
            headers,
            path,
            secure,
        }
    }

    pub fn from_request<B>(request: &'a Request<B>, secure: bool) -> Self {
        Self::new(request.headers(), request.uri().path(), secure)
    }

    pub fn headers(&self) -> &HeaderMap {
        self.headers
    }

    /// First value of the named header, when it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Every value of the named header, in insertion order.
    pub fn header_all(&self, name: &str) -> impl Iterator<Item = &HeaderValue> {
        self.headers.get_all(name).iter()
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    pub fn path(&self) -> &str {
        self.path
    }

    /// Whether the transport the request arrived on is encrypted.
    pub fn is_secure(&self) -> bool {
        self.secure
    }
}

/// An accepted request plus the additive header overlay computed for it.
///
/// The overlay is frozen at construction; names in it are disjoint from the
/// base request's header names, so applying it never replaces a header the
/// caller supplied.
pub struct AugmentedRequest {
    inner: Request<Body>,
    overlay: HeaderOverlay,
}

impl AugmentedRequest {
    pub fn new(inner: Request<Body>, overlay: HeaderOverlay) -> Self {
        Self { inner, overlay }
    }

    pub fn overlay(&self) -> &HeaderOverlay {
        &self.overlay
    }

    /// Effective header lookup: base request first, then the overlay.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.inner
            .headers()
            .get(name)
            .or_else(|| self.overlay.get(name))
    }

    /// Materialize the request handed downstream.
    pub fn into_inner(mut self) -> Request<Body> {
        self.overlay.apply(self.inner.headers_mut());
        self.inner
    }
}

/// Layer that stamps requests with an `X-Request-Id` if they lack one.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(request)
    }
}
