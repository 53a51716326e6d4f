//! Cache-Control middleware.

use std::sync::Arc;

use cachectl_core::header_names::{CACHE_CONTROL, PRAGMA};
use cachectl_core::{Middleware, Next, ResponseHeaders};

use crate::directive::{DirectiveList, Freshness};
use crate::error::PolicyError;
use crate::policy::PolicyOptions;
use crate::timespan::Ttl;

/// Pragma value sent alongside uncacheable policies.
pub const PRAGMA_NO_CACHE: &str = "no-cache";

/// Middleware that stamps a fixed cache policy onto every response.
///
/// The header value is computed once when the policy is built. Cloning is
/// cheap and clones share the same header string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheControl {
    header: Arc<str>,
    set_pragma: bool,
}

impl CacheControl {
    /// Build a policy from explicit options.
    pub fn custom(opts: PolicyOptions) -> Result<Self, PolicyError> {
        let freshness = Freshness::resolve(&opts)?;
        Ok(Self::compile(&opts, freshness))
    }

    /// `no-cache, no-store, must-revalidate, proxy-revalidate` with `Pragma: no-cache`.
    pub fn disable() -> Self {
        Self::compile(&PolicyOptions::disable(), Freshness::Disabled)
    }

    /// `private, no-cache, no-store, must-revalidate, no-transform` with `Pragma: no-cache`.
    pub fn secure() -> Self {
        Self::compile(&PolicyOptions::secure(), Freshness::Disabled)
    }

    /// Public policy: browsers and shared caches keep the response for `ttl`.
    ///
    /// `ttl` defaults to one hour. Other fields of `opts` are kept, except
    /// `scope`, `ttl` and `sttl` which the preset overwrites.
    pub fn public(ttl: Option<Ttl>, opts: Option<PolicyOptions>) -> Result<Self, PolicyError> {
        Self::custom(opts.unwrap_or_default().into_public(ttl))
    }

    /// Private policy: only the client keeps the response for `ttl`.
    ///
    /// `ttl` defaults to one hour. Other fields of `opts` are kept, except
    /// `scope` and `ttl` which the preset overwrites.
    pub fn private(ttl: Option<Ttl>, opts: Option<PolicyOptions>) -> Result<Self, PolicyError> {
        Self::custom(opts.unwrap_or_default().into_private(ttl))
    }

    fn compile(opts: &PolicyOptions, freshness: Freshness) -> Self {
        let directives = DirectiveList::build(opts, freshness);
        let header = directives.to_header_value();
        let set_pragma = opts.no_cache;

        tracing::debug!(cache_control = %header, set_pragma, "compiled cache policy");

        Self {
            header: header.into(),
            set_pragma,
        }
    }

    /// The precomputed Cache-Control value.
    pub fn header_value(&self) -> &str {
        &self.header
    }

    /// Whether responses also get `Pragma: no-cache`.
    pub fn sets_pragma(&self) -> bool {
        self.set_pragma
    }

    /// Write the policy headers onto a response.
    ///
    /// Cacheable policies remove any `Pragma` header left by earlier handlers.
    pub fn apply<R: ResponseHeaders + ?Sized>(&self, res: &mut R) {
        res.set_header(CACHE_CONTROL, &self.header);
        if self.set_pragma {
            res.set_header(PRAGMA, PRAGMA_NO_CACHE);
        } else {
            res.remove_header(PRAGMA);
        }
        tracing::trace!(cache_control = %self.header, "applied cache policy");
    }

    /// Header pairs this policy writes.
    pub fn to_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(CACHE_CONTROL.to_string(), self.header.to_string())];
        if self.set_pragma {
            headers.push((PRAGMA.to_string(), PRAGMA_NO_CACHE.to_string()));
        }
        headers
    }
}

impl<Req: ?Sized, Res: ResponseHeaders + ?Sized> Middleware<Req, Res> for CacheControl {
    fn handle(&self, _req: &Req, res: &mut Res, next: Next<'_>) {
        self.apply(res);
        next.run();
    }
}
