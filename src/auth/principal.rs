//! Authenticated identity types.

use std::fmt;

/// The identity established for a request by a successful authenticator.
///
/// Authenticators are free to produce richer principal types (token claims,
/// certificate subjects); the pipeline only relies on the name. A principal
/// lives for the duration of one request and is never persisted.
pub trait Principal: fmt::Debug + Send + Sync {
    /// The principal's name (user, service account, subject).
    fn name(&self) -> &str;
}

/// Minimal principal carrying just a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicPrincipal {
    name: String,
}

impl BasicPrincipal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Principal for BasicPrincipal {
    fn name(&self) -> &str {
        &self.name
    }
}
