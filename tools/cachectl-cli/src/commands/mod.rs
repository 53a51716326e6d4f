//! CLI command implementations.

pub mod check;
pub mod header;
pub mod policies;

use cachectl::{CacheScope, PolicyOptions, Preset, Ttl};
use clap::{Args, ValueEnum};
use serde::Serialize;

/// Preset names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Disable,
    Secure,
    Public,
    Private,
    Custom,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Disable => Preset::Disable,
            PresetArg::Secure => Preset::Secure,
            PresetArg::Public => Preset::Public,
            PresetArg::Private => Preset::Private,
            PresetArg::Custom => Preset::Custom,
        }
    }
}

/// Scope names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Public,
    Private,
}

impl From<ScopeArg> for CacheScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Public => CacheScope::Public,
            ScopeArg::Private => CacheScope::Private,
        }
    }
}

/// Arguments for the header command.
#[derive(Args)]
pub struct HeaderArgs {
    /// Preset to render.
    #[arg(value_enum)]
    pub preset: PresetArg,

    /// Freshness lifetime, in seconds or as a duration such as "1h".
    #[arg(long)]
    pub ttl: Option<Ttl>,

    /// Shared-cache lifetime (s-maxage).
    #[arg(long)]
    pub sttl: Option<Ttl>,

    /// Scope for the custom preset.
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,

    /// Disable caching (custom preset).
    #[arg(long)]
    pub no_cache: bool,

    /// Add must-revalidate.
    #[arg(long)]
    pub must_revalidate: bool,

    /// Add proxy-revalidate.
    #[arg(long)]
    pub proxy_revalidate: bool,

    /// Add no-transform.
    #[arg(long)]
    pub no_transform: bool,
}

impl HeaderArgs {
    /// Collect the option flags into policy options.
    pub fn options(&self) -> PolicyOptions {
        PolicyOptions {
            scope: self.scope.map(CacheScope::from),
            no_cache: self.no_cache,
            must_revalidate: self.must_revalidate,
            proxy_revalidate: self.proxy_revalidate,
            no_transform: self.no_transform,
            ttl: self.ttl.clone(),
            sttl: self.sttl.clone(),
        }
    }
}

/// Arguments for the policies command.
#[derive(Args)]
pub struct PoliciesArgs {
    /// Only show this policy.
    pub name: Option<String>,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Fail when no config file is found.
    #[arg(long)]
    pub strict: bool,
}

/// Rendered headers for one policy.
#[derive(Debug, Serialize)]
pub struct PolicyReport {
    /// Policy name, if it came from the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Preset used.
    pub preset: &'static str,
    /// Cache-Control value.
    pub cache_control: String,
    /// Pragma value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pragma: Option<String>,
}

impl PolicyReport {
    /// Describe a built policy.
    pub fn new(name: Option<&str>, preset: Preset, policy: &cachectl::CacheControl) -> Self {
        Self {
            name: name.map(str::to_string),
            preset: preset.as_str(),
            cache_control: policy.header_value().to_string(),
            pragma: policy
                .sets_pragma()
                .then(|| cachectl::PRAGMA_NO_CACHE.to_string()),
        }
    }
}
