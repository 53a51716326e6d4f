//! Named policies loaded from TOML or JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::middleware::CacheControl;
use crate::policy::{CacheScope, PolicyOptions};
use crate::timespan::{Ttl, DEFAULT_TTL};

static FALLBACK_TTL: Ttl = DEFAULT_TTL;

/// Which constructor a named policy goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Disable,
    Secure,
    Public,
    Private,
    Custom,
}

impl Preset {
    /// Lowercase preset name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Secure => "secure",
            Self::Public => "public",
            Self::Private => "private",
            Self::Custom => "custom",
        }
    }
}

/// A policy entry in the configuration file.
///
/// Options sit next to `preset` in the same table. Unknown keys are a parse
/// error so a misspelled flag cannot leave a policy cacheable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PolicyEntry")]
pub struct NamedPolicy {
    /// Constructor to use.
    pub preset: Preset,
    /// Options handed to the constructor.
    #[serde(flatten)]
    pub options: PolicyOptions,
}

// `flatten` cannot be combined with `deny_unknown_fields`, so entries are
// read through a flat table listing every option key.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyEntry {
    preset: Preset,
    #[serde(default)]
    scope: Option<CacheScope>,
    #[serde(default)]
    no_cache: bool,
    #[serde(default)]
    must_revalidate: bool,
    #[serde(default)]
    proxy_revalidate: bool,
    #[serde(default)]
    no_transform: bool,
    #[serde(default)]
    ttl: Option<Ttl>,
    #[serde(default)]
    sttl: Option<Ttl>,
}

impl From<PolicyEntry> for NamedPolicy {
    fn from(entry: PolicyEntry) -> Self {
        Self {
            preset: entry.preset,
            options: PolicyOptions {
                scope: entry.scope,
                no_cache: entry.no_cache,
                must_revalidate: entry.must_revalidate,
                proxy_revalidate: entry.proxy_revalidate,
                no_transform: entry.no_transform,
                ttl: entry.ttl,
                sttl: entry.sttl,
            },
        }
    }
}

impl NamedPolicy {
    /// Create an entry.
    pub fn new(preset: Preset, options: PolicyOptions) -> Self {
        Self { preset, options }
    }

    /// Build the middleware for this entry.
    ///
    /// `default_ttl` stands in for a missing ttl on `public` and `private`.
    pub fn build(&self, default_ttl: &Ttl) -> Result<CacheControl, PolicyError> {
        match self.preset {
            Preset::Disable | Preset::Secure => {
                if self.options != PolicyOptions::default() {
                    tracing::warn!(
                        preset = self.preset.as_str(),
                        "preset takes no options; ignoring configured fields"
                    );
                }
                Ok(match self.preset {
                    Preset::Disable => CacheControl::disable(),
                    _ => CacheControl::secure(),
                })
            }
            Preset::Public => {
                let ttl = self.options.ttl.clone().unwrap_or_else(|| default_ttl.clone());
                CacheControl::public(Some(ttl), Some(self.options.clone()))
            }
            Preset::Private => {
                let ttl = self.options.ttl.clone().unwrap_or_else(|| default_ttl.clone());
                CacheControl::private(Some(ttl), Some(self.options.clone()))
            }
            Preset::Custom => CacheControl::custom(self.options.clone()),
        }
    }
}

/// Policy configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Lifetime for `public` and `private` entries without a ttl.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ttl: Option<Ttl>,

    /// Named policies.
    #[serde(default)]
    pub policies: BTreeMap<String, NamedPolicy>,
}

impl PolicyConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        tracing::debug!(
            path = %path.display(),
            policies = config.policies.len(),
            "loaded policy config"
        );
        Ok(config)
    }

    /// Parse TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON config.
    pub fn from_json_str(content: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Add a named policy.
    pub fn with_policy(mut self, name: impl Into<String>, policy: NamedPolicy) -> Self {
        self.policies.insert(name.into(), policy);
        self
    }

    /// The ttl used when `public` and `private` entries give none.
    pub fn default_ttl(&self) -> &Ttl {
        self.default_ttl.as_ref().unwrap_or(&FALLBACK_TTL)
    }

    /// Build one named policy.
    pub fn build(&self, name: &str) -> Result<CacheControl, PolicyError> {
        let policy = self
            .policies
            .get(name)
            .ok_or_else(|| PolicyError::UnknownPolicy(name.to_string()))?;
        policy.build(self.default_ttl())
    }

    /// Build every policy, failing on the first invalid one.
    pub fn build_all(&self) -> Result<BTreeMap<String, CacheControl>, PolicyError> {
        self.policies
            .iter()
            .map(|(name, policy)| Ok((name.clone(), policy.build(self.default_ttl())?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_ttl = "10m"

[policies.assets]
preset = "public"
ttl = "7d"
must_revalidate = true

[policies.account]
preset = "secure"

[policies.profile]
preset = "private"

[policies.feed]
preset = "custom"
scope = "public"
ttl = 600
sttl = "1h"
no_transform = true
"#;

    // === Parsing Tests ===

    #[test]
    fn test_parse_toml() {
        let config = PolicyConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.policies.len(), 4);
        assert_eq!(config.default_ttl, Some(Ttl::from("10m")));

        let feed = &config.policies["feed"];
        assert_eq!(feed.preset, Preset::Custom);
        assert_eq!(feed.options.scope, Some(CacheScope::Public));
        assert_eq!(feed.options.ttl, Some(Ttl::Seconds(600)));
    }

    #[test]
    fn test_parse_json() {
        let config = PolicyConfig::from_json_str(
            r#"{"policies": {"static": {"preset": "public", "ttl": 86400}}}"#,
        )
        .unwrap();
        assert_eq!(
            config.build("static").unwrap().header_value(),
            "public, max-age=86400, s-maxage=86400"
        );
    }

    #[test]
    fn test_parse_rejects_unknown_preset() {
        let result = PolicyConfig::from_toml_str("[policies.x]\npreset = \"forever\"\n");
        assert!(matches!(result, Err(PolicyError::Config(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_scope() {
        let result = PolicyConfig::from_toml_str("[policies.x]\npreset = \"custom\"\nscope = \"cdn\"\n");
        assert!(matches!(result, Err(PolicyError::Config(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let result = PolicyConfig::from_toml_str(
            "[policies.account]\npreset = \"custom\"\nno_cahce = true\nmust_revalidat = true\n",
        );
        match result {
            Err(PolicyError::Config(msg)) => assert!(msg.contains("no_cahce"), "{}", msg),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_rejects_unknown_field() {
        let result = PolicyConfig::from_json_str(r#"{"policies": {"a": {"preset": "public", "tll": 60}}}"#);
        assert!(matches!(result, Err(PolicyError::Config(_))));
    }

    #[test]
    fn test_parse_fractional_ttl_matches_text() {
        let config = PolicyConfig::from_toml_str(
            "[policies.a]\npreset = \"private\"\nttl = 90.5\n\n[policies.b]\npreset = \"private\"\nttl = \"90.5\"\n",
        )
        .unwrap();
        assert_eq!(config.policies["a"].options.ttl, Some(Ttl::Seconds(90)));
        assert_eq!(config.build("a").unwrap(), config.build("b").unwrap());
    }

    #[test]
    fn test_parse_rejects_negative_ttl() {
        let result = PolicyConfig::from_toml_str("[policies.a]\npreset = \"public\"\nttl = -60\n");
        assert!(matches!(result, Err(PolicyError::Config(_))));
    }

    #[test]
    fn test_empty_config() {
        let config = PolicyConfig::from_toml_str("").unwrap();
        assert!(config.policies.is_empty());
        assert_eq!(config.default_ttl(), &DEFAULT_TTL);
        assert!(config.build_all().unwrap().is_empty());
    }

    // === Build Tests ===

    #[test]
    fn test_build_presets() {
        let config = PolicyConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(
            config.build("assets").unwrap().header_value(),
            "public, max-age=604800, s-maxage=604800, must-revalidate"
        );
        assert_eq!(
            config.build("account").unwrap().header_value(),
            "private, no-cache, no-store, must-revalidate, no-transform"
        );
        assert_eq!(
            config.build("feed").unwrap().header_value(),
            "public, max-age=600, s-maxage=3600, no-transform"
        );
    }

    #[test]
    fn test_build_uses_config_default_ttl() {
        let config = PolicyConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.build("profile").unwrap().header_value(), "private, max-age=600");
    }

    #[test]
    fn test_build_unknown_policy() {
        let config = PolicyConfig::default();
        let err = config.build("missing").unwrap_err();
        assert!(matches!(err, PolicyError::UnknownPolicy(ref name) if name == "missing"));
    }

    #[test]
    fn test_disable_ignores_options() {
        let config = PolicyConfig::default().with_policy(
            "off",
            NamedPolicy::new(Preset::Disable, PolicyOptions::new().with_ttl(Ttl::Seconds(5))),
        );
        assert_eq!(config.build("off").unwrap(), CacheControl::disable());
    }

    #[test]
    fn test_build_all_fails_on_invalid_entry() {
        let config = PolicyConfig::default()
            .with_policy("ok", NamedPolicy::new(Preset::Private, PolicyOptions::new()))
            .with_policy(
                "broken",
                NamedPolicy::new(Preset::Public, PolicyOptions::new().with_ttl("someday")),
            );
        assert!(matches!(config.build_all(), Err(PolicyError::InvalidDuration { .. })));
    }

    // === File Tests ===

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachectl.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = PolicyConfig::load(&path).unwrap();
        assert_eq!(config.build_all().unwrap().len(), 4);
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachectl.json");
        std::fs::write(&path, r#"{"policies": {"off": {"preset": "disable"}}}"#).unwrap();

        let config = PolicyConfig::load(&path).unwrap();
        assert!(config.build("off").unwrap().sets_pragma());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PolicyConfig::load("/nonexistent/cachectl.toml").unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }));
    }
}
