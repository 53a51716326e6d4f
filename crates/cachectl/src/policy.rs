//! Cache policy options.

use serde::{Deserialize, Serialize};

use crate::timespan::{Ttl, DEFAULT_TTL};

/// Cache scope determining who can cache the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// Cacheable by CDN and browser (shared cache).
    Public,
    /// Cacheable by browser only (private cache).
    Private,
}

/// Options a cache policy is built from.
///
/// Every field is optional. With nothing set the policy is
/// `private, max-age=3600`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyOptions {
    /// Visibility directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<CacheScope>,
    /// Suppress caching entirely.
    pub no_cache: bool,
    /// Emit `must-revalidate`.
    pub must_revalidate: bool,
    /// Emit `proxy-revalidate`.
    pub proxy_revalidate: bool,
    /// Emit `no-transform`.
    pub no_transform: bool,
    /// Freshness lifetime for any cache (`max-age`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Ttl>,
    /// Freshness lifetime for shared caches (`s-maxage`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sttl: Option<Ttl>,
}

impl PolicyOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that switch caching off everywhere.
    pub fn disable() -> Self {
        Self {
            no_cache: true,
            must_revalidate: true,
            proxy_revalidate: true,
            ..Default::default()
        }
    }

    /// Options for sensitive responses: private, uncached and untransformed.
    pub fn secure() -> Self {
        Self {
            scope: Some(CacheScope::Private),
            no_cache: true,
            must_revalidate: true,
            no_transform: true,
            ..Default::default()
        }
    }

    /// Merge a public scope into these options.
    ///
    /// Browsers and shared caches get the same lifetime: `ttl` and `sttl` are
    /// both overwritten with `ttl`, or [`DEFAULT_TTL`] when absent.
    pub fn into_public(mut self, ttl: Option<Ttl>) -> Self {
        let ttl = ttl.unwrap_or(DEFAULT_TTL);
        self.scope = Some(CacheScope::Public);
        self.sttl = Some(ttl.clone());
        self.ttl = Some(ttl);
        self
    }

    /// Merge a private scope into these options.
    ///
    /// Overwrites `ttl` with `ttl` or [`DEFAULT_TTL`]; `sttl` is left as is.
    pub fn into_private(mut self, ttl: Option<Ttl>) -> Self {
        self.scope = Some(CacheScope::Private);
        self.ttl = Some(ttl.unwrap_or(DEFAULT_TTL));
        self
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: CacheScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Disable caching.
    pub fn with_no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// Require revalidation once stale.
    pub fn with_must_revalidate(mut self) -> Self {
        self.must_revalidate = true;
        self
    }

    /// Require shared caches to revalidate once stale.
    pub fn with_proxy_revalidate(mut self) -> Self {
        self.proxy_revalidate = true;
        self
    }

    /// Forbid intermediaries from transforming the body.
    pub fn with_no_transform(mut self) -> Self {
        self.no_transform = true;
        self
    }

    /// Set the freshness lifetime.
    pub fn with_ttl(mut self, ttl: impl Into<Ttl>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    /// Set the shared-cache freshness lifetime.
    pub fn with_sttl(mut self, sttl: impl Into<Ttl>) -> Self {
        self.sttl = Some(sttl.into());
        self
    }
}
