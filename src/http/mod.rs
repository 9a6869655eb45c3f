//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, secure-transport decision)
//!     → request.rs (request view, add request ID, header overlay wrapper)
//!     → filter (authenticate, gate, augment)
//!     → forward to the upstream (client subsystem)
//! ```

pub mod request;
pub mod server;

pub use request::{AugmentedRequest, RequestIdLayer, RequestView, X_REQUEST_ID};
pub use server::HttpServer;
