//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Catch startup-fatal wiring problems before the server accepts requests
//! - Validate value ranges and referential integrity
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::header::HeaderName;
use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, HeaderSourceConfig};
use crate::filter::PathPattern;

/// Startup-fatal wiring errors.
///
/// These must prevent the server from accepting requests rather than
/// surfacing per-request.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("authenticator chain is empty; there is no way to authenticate any request")]
    EmptyAuthenticatorChain,

    #[error("invalid path pattern {pattern:?}: {reason}")]
    InvalidPathPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("unknown authentication provider {0:?}")]
    UnknownProvider(String),

    #[error("invalid upstream address {address:?}")]
    InvalidUpstream { address: String },
}

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoAuthProviders,
    UnknownAuthProvider(String),
    EmptyCredentialTable { provider: String },
    InvalidPathPattern { pattern: String, reason: String },
    InvalidUpstreamAddress { address: String },
    InvalidHeaderName { source: String, name: String },
    UnnamedHeaderSource,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoAuthProviders => {
                write!(f, "auth.providers is empty; configure at least one provider")
            }
            ValidationError::UnknownAuthProvider(name) => {
                write!(f, "unknown auth provider '{}'", name)
            }
            ValidationError::EmptyCredentialTable { provider } => {
                write!(f, "provider '{}' is enabled but its credential table is empty", provider)
            }
            ValidationError::InvalidPathPattern { pattern, reason } => {
                write!(f, "invalid credential-exchange path pattern '{}': {}", pattern, reason)
            }
            ValidationError::InvalidUpstreamAddress { address } => {
                write!(f, "invalid upstream address '{}'", address)
            }
            ValidationError::InvalidHeaderName { source, name } => {
                write!(f, "header source '{}' uses invalid header name '{}'", source, name)
            }
            ValidationError::UnnamedHeaderSource => {
                write!(f, "header source without a name")
            }
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.providers.is_empty() {
        errors.push(ValidationError::NoAuthProviders);
    }
    for provider in &config.auth.providers {
        match provider.as_str() {
            "bearer" => {
                if config.auth.bearer.tokens.is_empty() {
                    errors.push(ValidationError::EmptyCredentialTable {
                        provider: provider.clone(),
                    });
                }
            }
            "basic" => {
                if config.auth.basic.users.is_empty() {
                    errors.push(ValidationError::EmptyCredentialTable {
                        provider: provider.clone(),
                    });
                }
            }
            other => {
                errors.push(ValidationError::UnknownAuthProvider(other.to_string()));
            }
        }
    }

    if let Err(ConfigurationError::InvalidPathPattern { reason, .. }) =
        PathPattern::compile(&config.security.credential_exchange_path)
    {
        errors.push(ValidationError::InvalidPathPattern {
            pattern: config.security.credential_exchange_path.clone(),
            reason: reason.to_string(),
        });
    }

    if config.upstream.address.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidUpstreamAddress {
            address: config.upstream.address.clone(),
        });
    }

    for source in config.modifiers.iter().chain(config.client_filters.iter()) {
        validate_header_source(source, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_header_source(source: &HeaderSourceConfig, errors: &mut Vec<ValidationError>) {
    if source.name.is_empty() {
        errors.push(ValidationError::UnnamedHeaderSource);
    }
    for name in source.declares.iter().chain(source.headers.keys()) {
        if name.parse::<HeaderName>().is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                source: source.name.clone(),
                name: name.clone(),
            });
        }
    }
}
