//! Request authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → chain.rs (try each configured authenticator in order)
//!     → first success wins, identity attached to the request
//!     → all failures aggregate into one AuthenticationError
//! ```
//!
//! # Design Decisions
//! - Authenticators are trait objects registered once at startup
//! - First success short-circuits the chain; no ranking between strategies
//! - A failed authenticator is never retried within the same request
//! - An empty chain is a startup error, not a per-request 401

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::request::RequestView;

pub mod basic;
pub mod bearer;
pub mod chain;
pub mod principal;

pub use basic::BasicCredentialsAuthenticator;
pub use bearer::BearerTokenAuthenticator;
pub use chain::AuthenticationChain;
pub use principal::{BasicPrincipal, Principal};

/// A single authentication strategy.
///
/// Implementations may perform blocking I/O (e.g. contact an identity
/// provider); the async boundary keeps one slow strategy from stalling
/// unrelated requests.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Short name used in logs and aggregated failure messages.
    fn name(&self) -> &str;

    /// Establish the caller's identity, or explain why this strategy
    /// could not.
    async fn authenticate(
        &self,
        request: &RequestView<'_>,
    ) -> Result<Arc<dyn Principal>, AuthFailure>;
}

/// One authenticator's reason for rejecting a request.
#[derive(Debug, Clone, Error)]
#[error("[{authenticator}] {reason}")]
pub struct AuthFailure {
    authenticator: String,
    reason: String,
}

impl AuthFailure {
    pub fn new(authenticator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            authenticator: authenticator.into(),
            reason: reason.into(),
        }
    }

    pub fn authenticator(&self) -> &str {
        &self.authenticator
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Every configured authenticator failed.
///
/// Carries the individual failures in chain order so the boundary can render
/// one 401 that explains every strategy the caller could have satisfied.
#[derive(Debug)]
pub struct AuthenticationError {
    failures: Vec<AuthFailure>,
}

impl AuthenticationError {
    pub fn new(failures: Vec<AuthFailure>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[AuthFailure] {
        &self.failures
    }
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authentication failed: ")?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AuthenticationError {}
