//! Inbound authentication and header-augmentation filter.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → AuthenticationChain (establish identity, or reject)
//!     → eligibility gate (secure transport + credential-exchange path)
//!     → header merge over the modifier registry
//!     → Augmented / Passthrough decision handed to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Modifiers are never consulted for unauthenticated or ineligible
//!   requests
//! - Eligibility is evaluated exactly once per request
//! - An eligible request with an empty overlay passes through untouched
//! - The filter produces a structured decision; rendering the 401 belongs
//!   to the HTTP boundary

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::auth::{AuthenticationChain, AuthenticationError, Principal};
use crate::http::request::{AugmentedRequest, RequestView};
use crate::modifier::{compute_overlay, ModifierContext, RequestModifierRegistry};

pub mod eligibility;

pub use eligibility::{EligibilityPolicy, PathPattern};

/// Outcome of one filter pass.
pub enum FilterDecision {
    /// Authenticated, eligible, and augmented with extra headers.
    Augmented {
        request: AugmentedRequest,
        principal: Arc<dyn Principal>,
    },
    /// Authenticated; the request continues downstream unmodified.
    Passthrough {
        request: Request<Body>,
        principal: Arc<dyn Principal>,
    },
    /// Every authenticator failed.
    Rejected(AuthenticationError),
}

/// Orchestrates chain → eligibility → merge for inbound requests.
pub struct AuthenticationFilter {
    chain: AuthenticationChain,
    eligibility: EligibilityPolicy,
    modifiers: Arc<RequestModifierRegistry>,
}

impl AuthenticationFilter {
    pub fn new(
        chain: AuthenticationChain,
        eligibility: EligibilityPolicy,
        modifiers: Arc<RequestModifierRegistry>,
    ) -> Self {
        Self {
            chain,
            eligibility,
            modifiers,
        }
    }

    /// Process one inbound request.
    ///
    /// `secure` reflects whether the transport the request arrived on is
    /// encrypted; the HTTP layer derives it from the listener and, when
    /// trusted, from forwarding headers.
    pub async fn process(&self, request: Request<Body>, secure: bool) -> FilterDecision {
        let (principal, eligible) = {
            let view = RequestView::new(request.headers(), request.uri().path(), secure);
            let principal = match self.chain.authenticate(&view).await {
                Ok(principal) => principal,
                Err(err) => return FilterDecision::Rejected(err),
            };
            let eligible = self.eligibility.is_eligible(&view);
            (principal, eligible)
        };

        if !eligible {
            return FilterDecision::Passthrough { request, principal };
        }

        let overlay = {
            let ctx = ModifierContext::server(principal.as_ref());
            compute_overlay(request.headers(), self.modifiers.modifiers(), &ctx)
        };

        if overlay.is_empty() {
            return FilterDecision::Passthrough { request, principal };
        }

        tracing::debug!(
            principal = principal.name(),
            added = overlay.len(),
            "Augmenting eligible request"
        );
        FilterDecision::Augmented {
            request: AugmentedRequest::new(request, overlay),
            principal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::auth::{AuthFailure, Authenticator, BasicPrincipal};
    use crate::modifier::{
        HeaderSource, ModifierError, RequestModifier, StaticHeaderSource,
    };

    struct AlwaysAlice;

    #[async_trait]
    impl Authenticator for AlwaysAlice {
        fn name(&self) -> &str {
            "test"
        }

        async fn authenticate(
            &self,
            _request: &RequestView<'_>,
        ) -> Result<Arc<dyn Principal>, AuthFailure> {
            Ok(Arc::new(BasicPrincipal::new("alice")))
        }
    }

    struct AlwaysDenied(&'static str, &'static str);

    #[async_trait]
    impl Authenticator for AlwaysDenied {
        fn name(&self) -> &str {
            self.0
        }

        async fn authenticate(
            &self,
            _request: &RequestView<'_>,
        ) -> Result<Arc<dyn Principal>, AuthFailure> {
            Err(AuthFailure::new(self.0, self.1))
        }
    }

    struct PanickingModifier {
        declared: Vec<String>,
    }

    impl HeaderSource for PanickingModifier {
        fn name(&self) -> &str {
            "panicking"
        }

        fn declared_headers(&self) -> &[String] {
            &self.declared
        }

        fn extra_headers(
            &self,
            _ctx: &ModifierContext<'_>,
        ) -> Result<Option<Vec<(String, String)>>, ModifierError> {
            panic!("plugin bug")
        }
    }

    impl RequestModifier for PanickingModifier {}

    fn credential_modifier() -> Arc<dyn RequestModifier> {
        Arc::new(StaticHeaderSource::new(
            "credential-supplier",
            vec!["Extra-credential".to_string()],
            vec![("X-Custom-Header".to_string(), "CustomValue".to_string())],
        ))
    }

    fn filter_with(modifiers: Vec<Arc<dyn RequestModifier>>) -> AuthenticationFilter {
        let chain = AuthenticationChain::new(vec![Arc::new(AlwaysAlice)]).unwrap();
        let eligibility = EligibilityPolicy::from_pattern("/oauth2/token*").unwrap();
        AuthenticationFilter::new(
            chain,
            eligibility,
            Arc::new(RequestModifierRegistry::new(modifiers)),
        )
    }

    fn exchange_request() -> Request<Body> {
        Request::builder()
            .uri("/oauth2/token-value/")
            .header("X-Custom-Header1", "CustomValue1")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn eligible_request_is_augmented() {
        let filter = filter_with(vec![credential_modifier()]);

        let decision = filter.process(exchange_request(), true).await;

        let request = match decision {
            FilterDecision::Augmented { request, principal } => {
                assert_eq!(principal.name(), "alice");
                request.into_inner()
            }
            _ => panic!("expected augmentation"),
        };

        assert_eq!(request.headers().get("X-Custom-Header").unwrap(), "CustomValue");
        assert_eq!(
            request.headers().get("X-Custom-Header1").unwrap(),
            "CustomValue1"
        );
    }

    #[tokio::test]
    async fn insecure_transport_passes_through_unmodified() {
        let filter = filter_with(vec![credential_modifier()]);

        let decision = filter.process(exchange_request(), false).await;

        match decision {
            FilterDecision::Passthrough { request, principal } => {
                assert_eq!(principal.name(), "alice");
                assert!(request.headers().get("X-Custom-Header").is_none());
            }
            _ => panic!("expected passthrough"),
        }
    }

    #[tokio::test]
    async fn other_paths_pass_through_unmodified() {
        let filter = filter_with(vec![credential_modifier()]);

        let request = Request::builder()
            .uri("/v1/statement")
            .body(Body::empty())
            .unwrap();
        let decision = filter.process(request, true).await;

        match decision {
            FilterDecision::Passthrough { request, .. } => {
                assert!(request.headers().get("X-Custom-Header").is_none());
            }
            _ => panic!("expected passthrough"),
        }
    }

    #[tokio::test]
    async fn authentication_failure_rejects_without_consulting_modifiers() {
        let chain = AuthenticationChain::new(vec![
            Arc::new(AlwaysDenied("alpha", "x")) as Arc<dyn Authenticator>,
            Arc::new(AlwaysDenied("beta", "y")),
        ])
        .unwrap();
        let filter = AuthenticationFilter::new(
            chain,
            EligibilityPolicy::from_pattern("/oauth2/token*").unwrap(),
            Arc::new(RequestModifierRegistry::new(vec![credential_modifier()])),
        );

        let decision = filter.process(exchange_request(), true).await;

        match decision {
            FilterDecision::Rejected(err) => {
                let message = err.to_string();
                assert!(message.contains("x"));
                assert!(message.contains("y"));
            }
            _ => panic!("expected rejection"),
        }
    }

    #[tokio::test]
    async fn broken_modifier_does_not_fail_the_request() {
        let filter = filter_with(vec![
            Arc::new(PanickingModifier {
                declared: vec!["X-Boom".to_string()],
            }),
            credential_modifier(),
        ]);

        let decision = filter.process(exchange_request(), true).await;

        let request = match decision {
            FilterDecision::Augmented { request, .. } => request.into_inner(),
            _ => panic!("expected augmentation from the healthy modifier"),
        };
        assert_eq!(request.headers().get("X-Custom-Header").unwrap(), "CustomValue");
        assert!(request.headers().get("X-Boom").is_none());
    }

    #[tokio::test]
    async fn eligible_request_with_nothing_to_add_passes_through() {
        let filter = filter_with(vec![credential_modifier()]);

        // Declared header already present: the modifier is skipped.
        let request = Request::builder()
            .uri("/oauth2/token-value/")
            .header("Extra-credential", "caller-supplied")
            .body(Body::empty())
            .unwrap();
        let decision = filter.process(request, true).await;

        assert!(matches!(decision, FilterDecision::Passthrough { .. }));
    }
}
