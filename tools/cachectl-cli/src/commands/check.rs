//! Validate every named policy.

use anyhow::{bail, Result};
use serde::Serialize;

use super::CheckArgs;
use crate::context::Context;

#[derive(Debug, Serialize)]
struct CheckFailure {
    policy: String,
    error: String,
}

/// Run the check command.
pub fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    if ctx.config_path.is_none() {
        if args.strict {
            bail!("No config file found (looked for cachectl.toml, .cachectl.toml, cachectl.json)");
        }
        ctx.output.warn("No config file found, nothing to check");
        return Ok(());
    }

    let failures = collect_failures(ctx);
    let total = ctx.config.policies.len();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "policies": total,
            "failures": failures,
        }));
    } else {
        for failure in &failures {
            ctx.output.warn(&format!("{}: {}", failure.policy, failure.error));
        }
    }

    if !failures.is_empty() {
        bail!("{} of {} policies are invalid", failures.len(), total);
    }

    ctx.output.success(&format!("{} policies OK", total));
    Ok(())
}

fn collect_failures(ctx: &Context) -> Vec<CheckFailure> {
    ctx.config
        .policies
        .keys()
        .filter_map(|name| {
            ctx.config.build(name).err().map(|e| CheckFailure {
                policy: name.clone(),
                error: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cachectl::PolicyConfig;

    use super::*;
    use crate::output::Output;

    fn ctx(toml: &str, path: Option<&str>) -> Context {
        Context {
            config: PolicyConfig::from_toml_str(toml).unwrap(),
            config_path: path.map(PathBuf::from),
            output: Output::new(false, true),
        }
    }

    #[test]
    fn test_check_valid_config() {
        let ctx = ctx("[policies.a]\npreset = \"private\"\nttl = \"5m\"\n", Some("cachectl.toml"));
        assert!(run(CheckArgs { strict: false }, &ctx).is_ok());
    }

    #[test]
    fn test_check_reports_every_invalid_policy() {
        let ctx = ctx(
            "[policies.a]\npreset = \"private\"\nttl = \"soon\"\n\n[policies.b]\npreset = \"custom\"\nsttl = \"later\"\n\n[policies.c]\npreset = \"secure\"\n",
            Some("cachectl.toml"),
        );

        let failures = collect_failures(&ctx);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].policy, "a");
        assert_eq!(failures[1].policy, "b");

        let err = run(CheckArgs { strict: false }, &ctx).unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 policies are invalid");
    }

    #[test]
    fn test_check_without_config() {
        let ctx = ctx("", None);
        assert!(run(CheckArgs { strict: false }, &ctx).is_ok());
        assert!(run(CheckArgs { strict: true }, &ctx).is_err());
    }
}
