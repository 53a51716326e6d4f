//! Cache-Control header policies as response middleware.
//!
//! This crate provides:
//! - `CacheControl` - Middleware with `disable`, `secure`, `public`, `private` and `custom` presets
//! - `PolicyOptions` - Typed policy configuration
//! - `generate_header` - Options to ordered Cache-Control directives
//! - `to_timespan` - Durations such as `"1h"` to whole seconds
//! - `PolicyConfig` - Named policies loaded from TOML or JSON
//!
//! # Example
//!
//! ```ignore
//! use cachectl::{CacheControl, PolicyOptions, Ttl};
//! use cachectl_core::Response;
//!
//! // Shared caches and browsers keep the response for a day
//! let assets = CacheControl::public(Some(Ttl::from("1d")), None)?;
//!
//! // Private, one hour, revalidate once stale
//! let profile = CacheControl::private(None, Some(PolicyOptions::new().with_must_revalidate()))?;
//!
//! let mut res = Response::new(200);
//! assets.apply(&mut res);
//! assert_eq!(res.header("Cache-Control"), Some("public, max-age=86400, s-maxage=86400"));
//! ```

mod config;
mod directive;
mod error;
mod middleware;
mod policy;
mod timespan;

pub use config::*;
pub use directive::*;
pub use error::PolicyError;
pub use middleware::*;
pub use policy::*;
pub use timespan::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheControl, CacheScope, PolicyConfig, PolicyError, PolicyOptions, Ttl};
    pub use cachectl_core::{Middleware, Next, ResponseHeaders};
}
