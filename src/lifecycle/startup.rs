//! Building the pipelines from validated configuration.
//!
//! Everything constructed here is immutable for the process lifetime:
//! registry population completes before the first request is served, so no
//! worker can observe a partially-built chain or registry.

use std::sync::Arc;

use crate::auth::{
    AuthenticationChain, Authenticator, BasicCredentialsAuthenticator, BearerTokenAuthenticator,
};
use crate::client::ClientSideHeaderInjector;
use crate::config::{ConfigurationError, GatewayConfig};
use crate::filter::{AuthenticationFilter, EligibilityPolicy};
use crate::modifier::{
    ClientRequestFilter, ClientRequestFilterRegistry, RequestModifier, RequestModifierRegistry,
    StaticHeaderSource,
};

/// Build the authentication chain named by `auth.providers`, in order.
pub fn build_authentication_chain(
    config: &GatewayConfig,
) -> Result<AuthenticationChain, ConfigurationError> {
    let mut authenticators: Vec<Arc<dyn Authenticator>> =
        Vec::with_capacity(config.auth.providers.len());

    for provider in &config.auth.providers {
        match provider.as_str() {
            "bearer" => authenticators.push(Arc::new(BearerTokenAuthenticator::new(
                config.auth.bearer.tokens.clone(),
            ))),
            "basic" => authenticators.push(Arc::new(BasicCredentialsAuthenticator::new(
                config.auth.basic.users.clone(),
            ))),
            other => return Err(ConfigurationError::UnknownProvider(other.to_string())),
        }
    }

    AuthenticationChain::new(authenticators)
}

/// Build the server-side modifier registry, preserving config order.
pub fn build_modifier_registry(config: &GatewayConfig) -> RequestModifierRegistry {
    let modifiers: Vec<Arc<dyn RequestModifier>> = config
        .modifiers
        .iter()
        .map(|def| Arc::new(StaticHeaderSource::from_config(def)) as Arc<dyn RequestModifier>)
        .collect();
    RequestModifierRegistry::new(modifiers)
}

/// Build the outbound filter registry, preserving config order.
pub fn build_client_filter_registry(config: &GatewayConfig) -> ClientRequestFilterRegistry {
    let filters: Vec<Arc<dyn ClientRequestFilter>> = config
        .client_filters
        .iter()
        .map(|def| Arc::new(StaticHeaderSource::from_config(def)) as Arc<dyn ClientRequestFilter>)
        .collect();
    ClientRequestFilterRegistry::new(filters)
}

/// Build the complete inbound filter: chain, eligibility gate, modifiers.
pub fn build_authentication_filter(
    config: &GatewayConfig,
) -> Result<AuthenticationFilter, ConfigurationError> {
    let chain = build_authentication_chain(config)?;
    let eligibility = EligibilityPolicy::from_pattern(&config.security.credential_exchange_path)?;
    let modifiers = Arc::new(build_modifier_registry(config));
    Ok(AuthenticationFilter::new(chain, eligibility, modifiers))
}

/// Build the outbound header injector.
pub fn build_header_injector(config: &GatewayConfig) -> ClientSideHeaderInjector {
    ClientSideHeaderInjector::new(Arc::new(build_client_filter_registry(config)))
}
