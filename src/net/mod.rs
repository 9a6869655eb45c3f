//! Network-layer helpers.
//!
//! # Responsibilities
//! - Load TLS material for the listener

pub mod tls;

pub use tls::load_tls_config;
