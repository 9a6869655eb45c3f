//! Outbound pipeline toward the upstream.
//!
//! # Data Flow
//! ```text
//! Accepted request:
//!     → injector.rs (client filters contribute missing headers)
//!     → upstream.rs (URI rewrite, forward over hyper)
//!     → response returned to the caller
//! ```

pub mod injector;
pub mod upstream;

pub use injector::ClientSideHeaderInjector;
pub use upstream::{UpstreamClient, UpstreamError};
