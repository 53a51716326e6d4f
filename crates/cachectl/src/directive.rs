//! Cache-Control directive generation.

use std::fmt;

use crate::error::PolicyError;
use crate::policy::{CacheScope, PolicyOptions};
use crate::timespan::{to_timespan, DEFAULT_TTL};

/// A single Cache-Control directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Public,
    Private,
    NoCache,
    NoStore,
    /// `max-age=<seconds>`
    MaxAge(u64),
    /// `s-maxage=<seconds>`
    SMaxAge(u64),
    MustRevalidate,
    ProxyRevalidate,
    NoTransform,
}

impl From<CacheScope> for Directive {
    fn from(scope: CacheScope) -> Self {
        match scope {
            CacheScope::Public => Self::Public,
            CacheScope::Private => Self::Private,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Private => f.write_str("private"),
            Self::NoCache => f.write_str("no-cache"),
            Self::NoStore => f.write_str("no-store"),
            Self::MaxAge(secs) => write!(f, "max-age={}", secs),
            Self::SMaxAge(secs) => write!(f, "s-maxage={}", secs),
            Self::MustRevalidate => f.write_str("must-revalidate"),
            Self::ProxyRevalidate => f.write_str("proxy-revalidate"),
            Self::NoTransform => f.write_str("no-transform"),
        }
    }
}

/// Whether a policy lets caches store the response, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// `no-cache, no-store`.
    Disabled,
    /// `max-age` and optional `s-maxage`, in seconds.
    Fresh {
        max_age: u64,
        s_maxage: Option<u64>,
    },
}

impl Freshness {
    /// Resolve the caching branch for `opts`.
    ///
    /// Lifetimes are only parsed when caching is enabled, so a disabled
    /// policy never fails.
    pub fn resolve(opts: &PolicyOptions) -> Result<Self, PolicyError> {
        if opts.no_cache {
            return Ok(Self::Disabled);
        }

        let max_age = to_timespan(opts.ttl.as_ref().unwrap_or(&DEFAULT_TTL))?;
        let s_maxage = opts.sttl.as_ref().map(to_timespan).transpose()?;

        Ok(Self::Fresh { max_age, s_maxage })
    }
}

/// Ordered Cache-Control directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveList(Vec<Directive>);

impl DirectiveList {
    /// Build the directives for `opts` on an already resolved branch.
    ///
    /// Order: scope, freshness (`no-cache, no-store` or `max-age`,
    /// `s-maxage`), then `must-revalidate`, `proxy-revalidate`, `no-transform`.
    /// A cacheable policy without a scope falls back to `private`.
    pub fn build(opts: &PolicyOptions, freshness: Freshness) -> Self {
        let mut directives = Vec::with_capacity(6);

        if let Some(scope) = opts.scope {
            directives.push(Directive::from(scope));
        }

        match freshness {
            Freshness::Disabled => {
                directives.push(Directive::NoCache);
                directives.push(Directive::NoStore);
            }
            Freshness::Fresh { max_age, s_maxage } => {
                if directives.is_empty() {
                    directives.push(Directive::Private);
                }
                directives.push(Directive::MaxAge(max_age));
                if let Some(secs) = s_maxage {
                    directives.push(Directive::SMaxAge(secs));
                }
            }
        }

        if opts.must_revalidate {
            directives.push(Directive::MustRevalidate);
        }
        if opts.proxy_revalidate {
            directives.push(Directive::ProxyRevalidate);
        }
        if opts.no_transform {
            directives.push(Directive::NoTransform);
        }

        Self(directives)
    }

    /// Directives in emission order.
    pub fn as_slice(&self) -> &[Directive] {
        &self.0
    }

    /// Iterate over the directives.
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.0.iter()
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check for a directive.
    pub fn contains(&self, directive: &Directive) -> bool {
        self.0.contains(directive)
    }

    /// Join into a Cache-Control header value.
    pub fn to_header_value(&self) -> String {
        self.0
            .iter()
            .map(Directive::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DirectiveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

impl<'a> IntoIterator for &'a DirectiveList {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Generate the Cache-Control directives for `opts`.
pub fn generate_header(opts: &PolicyOptions) -> Result<DirectiveList, PolicyError> {
    let freshness = Freshness::resolve(opts)?;
    Ok(DirectiveList::build(opts, freshness))
}
