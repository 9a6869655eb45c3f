//! Header contribution plugins.
//!
//! # Data Flow
//! ```text
//! Server side:  authenticated request → merge.rs → header overlay → downstream
//! Client side:  outbound request      → merge.rs → header overlay → upstream
//! ```
//!
//! Both pipelines consult the same kind of plugin: a source declares which
//! header names it owns, and is asked for extra headers only when at least
//! one of those names is missing from the request. The merge rules live in
//! [`merge`]; registration order is the precedence order.
//!
//! # Design Decisions
//! - Registries are immutable after startup (thread-safe without locks)
//! - A source that fails, panics, or offers malformed headers contributes
//!   nothing; it cannot fail the request or disturb other sources

use thiserror::Error;

use crate::auth::Principal;

pub mod merge;
pub mod registry;
pub mod static_headers;

pub use merge::{compute_overlay, HeaderOverlay};
pub use registry::{ClientRequestFilterRegistry, RequestModifierRegistry};
pub use static_headers::StaticHeaderSource;

/// Context handed to a source when it is asked for extra headers.
///
/// The server pipeline carries the authenticated principal; the client
/// pipeline carries none. Sources that need a principal must return
/// `Ok(None)` when it is absent rather than fail.
#[derive(Clone, Copy)]
pub struct ModifierContext<'a> {
    principal: Option<&'a dyn Principal>,
}

impl<'a> ModifierContext<'a> {
    /// Context for the server-inbound pipeline.
    pub fn server(principal: &'a dyn Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    /// Context for the client-outbound pipeline (no inbound principal).
    pub fn client() -> Self {
        Self { principal: None }
    }

    pub fn principal(&self) -> Option<&dyn Principal> {
        self.principal
    }
}

/// A source implementation failed to produce its contribution.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ModifierError {
    message: String,
}

impl ModifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The shared contract of both pipelines' plugins.
pub trait HeaderSource: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &str;

    /// Header names this source owns, in declaration order.
    ///
    /// The source is consulted only when at least one of these is missing
    /// from the request; a source that declares nothing is never consulted.
    fn declared_headers(&self) -> &[String];

    /// Extra headers to contribute, if any.
    fn extra_headers(
        &self,
        ctx: &ModifierContext<'_>,
    ) -> Result<Option<Vec<(String, String)>>, ModifierError>;
}

/// A server-side source, consulted after authentication for requests that
/// pass the eligibility gate.
pub trait RequestModifier: HeaderSource {}

/// An outbound source, consulted unconditionally before an upstream call.
pub trait ClientRequestFilter: HeaderSource {}
