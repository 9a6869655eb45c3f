//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors reported)
//!     → GatewayConfig (validated, immutable)
//!     → registries and chain built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the registries it populates never
//!   change while requests are being served
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::HeaderSourceConfig;
pub use schema::ListenerConfig;
pub use validation::{validate_config, ConfigurationError, ValidationError};
