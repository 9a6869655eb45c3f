//! Forwarding to the configured upstream.

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Error forwarding a request to the upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build upstream URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
}

/// Thin wrapper over a shared hyper client pointed at one upstream.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl UpstreamClient {
    /// Create a client for the given `host:port` upstream address.
    pub fn new(address: &str) -> Result<Self, ConfigurationError> {
        let authority: Authority =
            address
                .parse()
                .map_err(|_| ConfigurationError::InvalidUpstream {
                    address: address.to_string(),
                })?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self { client, authority })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Rewrite the request URI to the upstream and forward it.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, UpstreamError> {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = Uri::from_parts(uri_parts)?;

        let request = Request::from_parts(parts, body);
        let response = self.client.request(request).await?;

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparsable_addresses() {
        assert!(UpstreamClient::new("not an authority").is_err());
    }

    #[test]
    fn accepts_host_port() {
        let client = UpstreamClient::new("127.0.0.1:9000").unwrap();
        assert_eq!(client.authority().as_str(), "127.0.0.1:9000");
    }
}
