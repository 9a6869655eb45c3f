//! Ordered fallback across authentication strategies.

use std::sync::Arc;

use crate::auth::{AuthFailure, AuthenticationError, Authenticator, Principal};
use crate::config::ConfigurationError;
use crate::http::request::RequestView;
use crate::observability::metrics;

/// Tries each configured authenticator in registration order.
///
/// The list is fixed at startup and shared read-only across concurrent
/// requests.
pub struct AuthenticationChain {
    authenticators: Vec<Arc<dyn Authenticator>>,
}

impl AuthenticationChain {
    /// Create a chain from an ordered authenticator list.
    ///
    /// An empty list is rejected here, before the first request: with no
    /// strategies configured there is provably no way to authenticate.
    pub fn new(authenticators: Vec<Arc<dyn Authenticator>>) -> Result<Self, ConfigurationError> {
        if authenticators.is_empty() {
            return Err(ConfigurationError::EmptyAuthenticatorChain);
        }
        Ok(Self { authenticators })
    }

    /// Authenticate a request.
    ///
    /// Stops at the first success; remaining authenticators are not tried.
    /// If every authenticator fails, the individual reasons are aggregated
    /// in chain order into a single [`AuthenticationError`].
    pub async fn authenticate(
        &self,
        request: &RequestView<'_>,
    ) -> Result<Arc<dyn Principal>, AuthenticationError> {
        let mut failures: Vec<AuthFailure> = Vec::with_capacity(self.authenticators.len());

        for authenticator in &self.authenticators {
            match authenticator.authenticate(request).await {
                Ok(principal) => {
                    metrics::record_auth_outcome(authenticator.name(), "success");
                    tracing::debug!(
                        authenticator = authenticator.name(),
                        principal = principal.name(),
                        "Authentication succeeded"
                    );
                    return Ok(principal);
                }
                Err(failure) => {
                    metrics::record_auth_outcome(authenticator.name(), "failure");
                    tracing::debug!(
                        authenticator = authenticator.name(),
                        reason = failure.reason(),
                        "Authenticator rejected request, trying next"
                    );
                    failures.push(failure);
                }
            }
        }

        Err(AuthenticationError::new(failures))
    }

    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::auth::BasicPrincipal;

    struct ScriptedAuthenticator {
        name: &'static str,
        outcome: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedAuthenticator {
        fn succeeding(name: &'static str, principal: &'static str) -> Self {
            Self {
                name,
                outcome: Ok(principal),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str, reason: &'static str) -> Self {
            Self {
                name,
                outcome: Err(reason),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Authenticator for ScriptedAuthenticator {
        fn name(&self) -> &str {
            self.name
        }

        async fn authenticate(
            &self,
            _request: &RequestView<'_>,
        ) -> Result<Arc<dyn Principal>, AuthFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Ok(principal) => Ok(Arc::new(BasicPrincipal::new(principal))),
                Err(reason) => Err(AuthFailure::new(self.name, reason)),
            }
        }
    }

    fn empty_view(headers: &HeaderMap) -> RequestView<'_> {
        RequestView::new(headers, "/", true)
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let failing = Arc::new(ScriptedAuthenticator::failing("first", "no credentials"));
        let succeeding = Arc::new(ScriptedAuthenticator::succeeding("second", "alice"));
        let never_called = Arc::new(ScriptedAuthenticator::succeeding("third", "bob"));

        let chain = AuthenticationChain::new(vec![
            failing.clone(),
            succeeding.clone(),
            never_called.clone(),
        ])
        .unwrap();

        let headers = HeaderMap::new();
        let principal = chain.authenticate(&empty_view(&headers)).await.unwrap();

        assert_eq!(principal.name(), "alice");
        assert_eq!(failing.call_count(), 1);
        assert_eq!(succeeding.call_count(), 1);
        assert_eq!(never_called.call_count(), 0);
    }

    #[tokio::test]
    async fn all_failures_aggregate_in_order() {
        let a = Arc::new(ScriptedAuthenticator::failing("alpha", "token expired"));
        let b = Arc::new(ScriptedAuthenticator::failing("beta", "bad password"));

        let chain = AuthenticationChain::new(vec![a, b]).unwrap();

        let headers = HeaderMap::new();
        let err = chain.authenticate(&empty_view(&headers)).await.unwrap_err();

        assert_eq!(err.failures().len(), 2);
        let message = err.to_string();
        assert!(message.contains("token expired"));
        assert!(message.contains("bad password"));
        assert!(
            message.find("token expired").unwrap() < message.find("bad password").unwrap(),
            "failure order must follow chain order: {message}"
        );
    }

    #[tokio::test]
    async fn failed_authenticators_run_exactly_once() {
        let a = Arc::new(ScriptedAuthenticator::failing("alpha", "nope"));
        let b = Arc::new(ScriptedAuthenticator::failing("beta", "nope"));

        let chain = AuthenticationChain::new(vec![a.clone(), b.clone()]).unwrap();

        let headers = HeaderMap::new();
        let _ = chain.authenticate(&empty_view(&headers)).await;

        assert_eq!(a.call_count(), 1);
        assert_eq!(b.call_count(), 1);
    }

    #[test]
    fn empty_chain_is_a_configuration_error() {
        let result = AuthenticationChain::new(Vec::new());
        assert!(matches!(
            result,
            Err(ConfigurationError::EmptyAuthenticatorChain)
        ));
    }
}
