//! Eligibility gate for header augmentation.
//!
//! # Responsibilities
//! - Compile the configured credential-exchange path pattern
//! - Decide, once per request, whether the merge stage may run
//!
//! # Design Decisions
//! - Pattern language is a literal path with an optional trailing `*`
//!   (prefix match); no regex, so matching stays O(path length)
//! - Malformed patterns fail at startup, never at request time

use crate::config::ConfigurationError;
use crate::http::request::RequestView;

/// Compiled path pattern: a literal, or a prefix when the configured text
/// ends in `*`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    prefix: String,
    wildcard: bool,
}

impl PathPattern {
    pub fn compile(pattern: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: &'static str| ConfigurationError::InvalidPathPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let (prefix, wildcard) = match pattern.strip_suffix('*') {
            Some(prefix) => (prefix, true),
            None => (pattern, false),
        };
        if prefix.contains('*') {
            return Err(invalid("'*' is only allowed as the final character"));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            wildcard,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.wildcard {
            path.starts_with(&self.prefix)
        } else {
            path == self.prefix
        }
    }
}

/// The secure-transport + path check gating header augmentation.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    pattern: PathPattern,
}

impl EligibilityPolicy {
    pub fn new(pattern: PathPattern) -> Self {
        Self { pattern }
    }

    pub fn from_pattern(pattern: &str) -> Result<Self, ConfigurationError> {
        Ok(Self::new(PathPattern::compile(pattern)?))
    }

    /// True when the transport is encrypted and the path is the configured
    /// credential-exchange endpoint.
    pub fn is_eligible(&self, request: &RequestView<'_>) -> bool {
        request.is_secure() && self.pattern.matches(request.path())
    }
}
