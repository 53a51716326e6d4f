//! List named policies.

use anyhow::{bail, Context as _, Result};
use cachectl::{to_timespan, NamedPolicy, Preset};

use super::{PoliciesArgs, PolicyReport};
use crate::context::Context;
use crate::output::{format_duration, preset_badge};

/// Run the policies command.
pub fn run(args: PoliciesArgs, ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    let selected: Vec<(&String, &NamedPolicy)> = match &args.name {
        Some(name) => match config.policies.get_key_value(name) {
            Some(entry) => vec![entry],
            None => bail!("Unknown policy: {}", name),
        },
        None => config.policies.iter().collect(),
    };

    let mut reports = Vec::with_capacity(selected.len());
    for (name, policy) in selected {
        let built = config
            .build(name)
            .with_context(|| format!("Policy '{}' is invalid", name))?;
        reports.push((policy, PolicyReport::new(Some(name.as_str()), policy.preset, &built)));
    }

    if ctx.output.is_json() {
        let reports: Vec<&PolicyReport> = reports.iter().map(|(_, report)| report).collect();
        ctx.output.json(&reports);
        return Ok(());
    }

    if reports.is_empty() {
        ctx.output.info("No policies configured");
        return Ok(());
    }

    ctx.output.header("Policies");
    for (policy, report) in &reports {
        println!("\n{} ({})", report.name.as_deref().unwrap_or_default(), preset_badge(report.preset));
        ctx.output.kv("Cache-Control", &report.cache_control);
        if let Some(pragma) = &report.pragma {
            ctx.output.kv("Pragma", pragma);
        }
        if let Some(secs) = lifetime(policy, ctx) {
            ctx.output.kv("lifetime", &format_duration(secs));
        }
    }

    Ok(())
}

/// Browser lifetime in seconds, for presets that cache.
fn lifetime(policy: &NamedPolicy, ctx: &Context) -> Option<u64> {
    let configured = policy.options.ttl.as_ref();
    let secs = match policy.preset {
        Preset::Disable | Preset::Secure => return None,
        _ if policy.options.no_cache => return None,
        Preset::Public | Preset::Private => to_timespan(configured.unwrap_or(ctx.config.default_ttl())),
        Preset::Custom => match configured {
            Some(ttl) => to_timespan(ttl),
            None => Ok(cachectl::DEFAULT_TTL_SECS),
        },
    };
    secs.ok()
}

#[cfg(test)]
mod tests {
    use cachectl::PolicyConfig;

    use super::*;
    use crate::output::Output;

    const CONFIG: &str = r#"
default_ttl = "2h"

[policies.assets]
preset = "public"

[policies.off]
preset = "disable"

[policies.feed]
preset = "custom"
no_cache = true
"#;

    fn ctx() -> Context {
        Context {
            config: PolicyConfig::from_toml_str(CONFIG).unwrap(),
            config_path: None,
            output: Output::new(false, true),
        }
    }

    #[test]
    fn test_lifetime() {
        let ctx = ctx();
        assert_eq!(lifetime(&ctx.config.policies["assets"], &ctx), Some(7200));
        assert_eq!(lifetime(&ctx.config.policies["off"], &ctx), None);
        assert_eq!(lifetime(&ctx.config.policies["feed"], &ctx), None);
    }

    #[test]
    fn test_run_all() {
        assert!(run(PoliciesArgs { name: None }, &ctx()).is_ok());
    }

    #[test]
    fn test_run_unknown_name() {
        let err = run(PoliciesArgs { name: Some("nope".to_string()) }, &ctx()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
