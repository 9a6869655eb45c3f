//! The header-merge algorithm shared by both pipelines.
//!
//! # Responsibilities
//! - Skip sources whose declared headers are all present on the request
//! - Collect offered headers with first-writer-wins precedence
//! - Never shadow a header the request already carries
//! - Isolate failing sources from the request and from each other
//!
//! # Design Decisions
//! - Output is an ordered overlay, disjoint from the request's header names
//! - Precedence is registration order; the result is deterministic no
//!   matter how many sources offer the same name
//! - Header-name comparison is case-insensitive (HTTP semantics)

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::modifier::{HeaderSource, ModifierContext};
use crate::observability::metrics;

/// Additive headers computed by one merge pass.
///
/// Built once per request, then frozen; names never collide with the base
/// request's headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderOverlay {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderOverlay {
    fn insert(&mut self, name: HeaderName, value: HeaderValue) {
        self.entries.push((name, value));
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add the overlay's headers to a header map.
    ///
    /// Overlay names are absent from the base map by construction, so this
    /// only ever introduces new names.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.entries {
            headers.insert(name.clone(), value.clone());
        }
    }
}

/// Run one merge pass over the given sources.
///
/// A source is consulted only when at least one of its declared headers is
/// missing from `headers`. Offered headers are taken in registration order;
/// the first source to offer a name wins, and names already on the request
/// are never taken. A source that returns an error, panics, or offers a
/// name/value that does not parse contributes nothing.
pub fn compute_overlay<S>(
    headers: &HeaderMap,
    sources: &[Arc<S>],
    ctx: &ModifierContext<'_>,
) -> HeaderOverlay
where
    S: HeaderSource + ?Sized,
{
    let mut overlay = HeaderOverlay::default();

    for source in sources {
        let declared = source.declared_headers();
        let all_present = declared
            .iter()
            .all(|name| headers.contains_key(name.as_str()));
        if all_present {
            // Precondition satisfied (vacuously so for an empty declaration);
            // nothing for this source to supply.
            continue;
        }

        let offered = match catch_unwind(AssertUnwindSafe(|| source.extra_headers(ctx))) {
            Ok(Ok(Some(offered))) => offered,
            Ok(Ok(None)) => continue,
            Ok(Err(err)) => {
                metrics::record_source_error(source.name());
                tracing::warn!(
                    source = source.name(),
                    error = %err,
                    "Header source failed; skipping its contribution"
                );
                continue;
            }
            Err(_) => {
                metrics::record_source_error(source.name());
                tracing::warn!(
                    source = source.name(),
                    "Header source panicked; skipping its contribution"
                );
                continue;
            }
        };

        match parse_offer(&offered) {
            Some(parsed) => {
                for (name, value) in parsed {
                    if !headers.contains_key(&name) && !overlay.contains(&name) {
                        overlay.insert(name, value);
                    }
                }
            }
            None => {
                metrics::record_source_error(source.name());
                tracing::warn!(
                    source = source.name(),
                    "Header source offered a malformed header; skipping its contribution"
                );
            }
        }
    }

    overlay
}

/// Parse an offered header set; a single malformed entry discards the offer.
fn parse_offer(offered: &[(String, String)]) -> Option<Vec<(HeaderName, HeaderValue)>> {
    let mut parsed = Vec::with_capacity(offered.len());
    for (name, value) in offered {
        let name = name.parse::<HeaderName>().ok()?;
        let value = HeaderValue::from_str(value).ok()?;
        parsed.push((name, value));
    }
    Some(parsed)
}
