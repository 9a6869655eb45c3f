//! Bearer token authentication against a static token table.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{AuthFailure, Authenticator, BasicPrincipal, Principal};
use crate::http::request::RequestView;

const NAME: &str = "bearer";

/// Maps `Authorization: Bearer <token>` values to principal names.
///
/// The table comes from configuration and is fixed for the process lifetime.
pub struct BearerTokenAuthenticator {
    tokens: BTreeMap<String, String>,
}

impl BearerTokenAuthenticator {
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    fn failure(&self, reason: &str) -> AuthFailure {
        AuthFailure::new(NAME, reason)
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn name(&self) -> &str {
        NAME
    }

    async fn authenticate(
        &self,
        request: &RequestView<'_>,
    ) -> Result<Arc<dyn Principal>, AuthFailure> {
        let value = request
            .header("authorization")
            .ok_or_else(|| self.failure("missing Authorization header"))?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| self.failure("not a Bearer credential"))?
            .trim();

        match self.tokens.get(token) {
            Some(user) => Ok(Arc::new(BasicPrincipal::new(user.clone()))),
            None => Err(self.failure("unknown token")),
        }
    }
}
