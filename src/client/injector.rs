//! Header injection for outbound requests.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::modifier::{compute_overlay, ClientRequestFilterRegistry, ModifierContext};

/// Runs the shared header merge over the client filter registry and applies
/// the result to an outbound request.
///
/// Unlike the inbound filter there is no authentication step and no
/// eligibility gate: the injector runs before every upstream call, with a
/// principal-less context.
pub struct ClientSideHeaderInjector {
    filters: Arc<ClientRequestFilterRegistry>,
}

impl ClientSideHeaderInjector {
    pub fn new(filters: Arc<ClientRequestFilterRegistry>) -> Self {
        Self { filters }
    }

    /// Add any missing filter-supplied headers to the outbound header map.
    pub fn decorate(&self, headers: &mut HeaderMap) {
        let overlay = {
            let ctx = ModifierContext::client();
            compute_overlay(headers, self.filters.filters(), &ctx)
        };
        if overlay.is_empty() {
            return;
        }
        tracing::debug!(added = overlay.len(), "Decorating outbound request");
        overlay.apply(headers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{ClientRequestFilter, StaticHeaderSource};

    fn injector_with(filters: Vec<Arc<dyn ClientRequestFilter>>) -> ClientSideHeaderInjector {
        ClientSideHeaderInjector::new(Arc::new(ClientRequestFilterRegistry::new(filters)))
    }

    #[test]
    fn adds_missing_declared_headers() {
        let injector = injector_with(vec![Arc::new(StaticHeaderSource::new(
            "downstream-creds",
            vec!["X-Downstream-Auth".to_string()],
            vec![("X-Downstream-Auth".to_string(), "token123".to_string())],
        ))]);

        let mut headers = HeaderMap::new();
        injector.decorate(&mut headers);

        assert_eq!(headers.get("X-Downstream-Auth").unwrap(), "token123");
    }

    #[test]
    fn leaves_present_headers_alone() {
        let injector = injector_with(vec![Arc::new(StaticHeaderSource::new(
            "downstream-creds",
            vec!["X-Downstream-Auth".to_string()],
            vec![("X-Downstream-Auth".to_string(), "token123".to_string())],
        ))]);

        let mut headers = HeaderMap::new();
        headers.insert("x-downstream-auth", "caller".parse().unwrap());
        injector.decorate(&mut headers);

        assert_eq!(headers.get("X-Downstream-Auth").unwrap(), "caller");
    }
}
