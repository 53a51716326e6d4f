//! Core abstractions for cachectl.
//!
//! This crate provides the seams that header policies plug into:
//! - `ResponseHeaders` - Header capability any response wrapper implements
//! - `Response` - In-memory response for tests and non-`http` integrations
//! - `Middleware` trait - Handler interface with a `Next` continuation
//! - `Chain` - Ordered middleware pipeline

mod middleware;
mod response;

pub use middleware::*;
pub use response::*;

/// Header names used by the policy middleware.
pub mod header_names {
    /// Cache directives for browsers, CDNs and proxies.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Legacy HTTP/1.0 no-cache signal.
    pub const PRAGMA: &str = "Pragma";
}
