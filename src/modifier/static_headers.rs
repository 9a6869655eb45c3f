//! Configuration-driven header source.

use crate::config::schema::HeaderSourceConfig;
use crate::modifier::{
    ClientRequestFilter, HeaderSource, ModifierContext, ModifierError, RequestModifier,
};

/// Supplies a fixed set of headers whenever one of its declared headers is
/// missing from the request.
///
/// This is the source shape deployments configure directly in the gateway's
/// config file; it works on both pipelines since it needs no principal.
pub struct StaticHeaderSource {
    name: String,
    declared: Vec<String>,
    headers: Vec<(String, String)>,
}

impl StaticHeaderSource {
    pub fn new(
        name: impl Into<String>,
        declared: Vec<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            declared,
            headers,
        }
    }

    pub fn from_config(config: &HeaderSourceConfig) -> Self {
        Self {
            name: config.name.clone(),
            declared: config.declares.clone(),
            headers: config
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }
}

impl HeaderSource for StaticHeaderSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_headers(&self) -> &[String] {
        &self.declared
    }

    fn extra_headers(
        &self,
        _ctx: &ModifierContext<'_>,
    ) -> Result<Option<Vec<(String, String)>>, ModifierError> {
        if self.headers.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.headers.clone()))
    }
}

impl RequestModifier for StaticHeaderSource {}
impl ClientRequestFilter for StaticHeaderSource {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header_set_contributes_nothing() {
        let source = StaticHeaderSource::new("empty", vec!["X-A".to_string()], Vec::new());
        let result = source.extra_headers(&ModifierContext::client()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn offers_configured_pairs() {
        let source = StaticHeaderSource::new(
            "creds",
            vec!["Extra-credential".to_string()],
            vec![("X-Custom-Header".to_string(), "CustomValue".to_string())],
        );
        let offered = source
            .extra_headers(&ModifierContext::client())
            .unwrap()
            .unwrap();
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0].0, "X-Custom-Header");
    }
}
