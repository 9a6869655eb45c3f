//! Authenticating gateway for a query-serving HTTP endpoint.
//!
//! Inbound requests pass through an ordered chain of authenticators, then an
//! eligibility gate (secure transport + credential-exchange path), then a
//! header merge over the registered request modifiers. Accepted requests are
//! forwarded to a single upstream; the outbound leg runs the mirror
//! client-filter pipeline before every call.

pub mod auth;
pub mod client;
pub mod config;
pub mod filter;
pub mod http;
pub mod lifecycle;
pub mod modifier;
pub mod net;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
