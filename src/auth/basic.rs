//! HTTP Basic authentication against a static user table.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::auth::{AuthFailure, Authenticator, BasicPrincipal, Principal};
use crate::http::request::RequestView;

const NAME: &str = "basic";

/// Validates `Authorization: Basic <base64(user:password)>` credentials.
pub struct BasicCredentialsAuthenticator {
    users: BTreeMap<String, String>,
}

impl BasicCredentialsAuthenticator {
    pub fn new(users: BTreeMap<String, String>) -> Self {
        Self { users }
    }

    fn failure(&self, reason: &str) -> AuthFailure {
        AuthFailure::new(NAME, reason)
    }
}

#[async_trait]
impl Authenticator for BasicCredentialsAuthenticator {
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

        let encoded = value
            .strip_prefix("Basic ")
            .ok_or_else(|| self.failure("not a Basic credential"))?
            .trim();

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| self.failure("credential is not valid base64"))?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| self.failure("credential is not valid UTF-8"))?;

        let (user, password) = decoded
            .split_once(':')
            .ok_or_else(|| self.failure("credential is not user:password"))?;

        // One failure message for both unknown user and wrong password.
        match self.users.get(user) {
            Some(expected) if expected == password => {
                Ok(Arc::new(BasicPrincipal::new(user.to_string())))
            }
            _ => Err(self.failure("invalid credentials")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    fn authenticator() -> BasicCredentialsAuthenticator {
        let mut users = BTreeMap::new();
        users.insert("alice".to_string(), "wonderland".to_string());
        BasicCredentialsAuthenticator::new(users)
    }

    fn view_with_credential(headers: &mut HeaderMap, credential: &str) {
        let encoded = STANDARD.encode(credential);
        headers.insert(
            "authorization",
            format!("Basic {encoded}").parse().unwrap(),
        );
    }

    #[tokio::test]
    async fn valid_credentials_yield_principal() {
        let mut headers = HeaderMap::new();
        view_with_credential(&mut headers, "alice:wonderland");
        let view = RequestView::new(&headers, "/", true);

        let principal = authenticator().authenticate(&view).await.unwrap();
        assert_eq!(principal.name(), "alice");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let mut headers = HeaderMap::new();
        view_with_credential(&mut headers, "alice:other");
        let view = RequestView::new(&headers, "/", true);

        let failure = authenticator().authenticate(&view).await.unwrap_err();
        assert!(failure.reason().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn garbage_base64_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic !!!".parse().unwrap());
        let view = RequestView::new(&headers, "/", true);

        let failure = authenticator().authenticate(&view).await.unwrap_err();
        assert!(failure.reason().contains("base64"));
    }
}
