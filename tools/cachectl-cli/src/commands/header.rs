//! Render the headers for a preset.

use anyhow::{Context as _, Result};
use cachectl::{CacheControl, NamedPolicy, Preset};

use super::{HeaderArgs, PolicyReport};
use crate::context::Context;

/// Run the header command.
pub fn run(args: HeaderArgs, ctx: &Context) -> Result<()> {
    let preset = Preset::from(args.preset);
    let policy = build(&args, ctx)?;
    let report = PolicyReport::new(None, preset, &policy);

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    for (name, value) in policy.to_headers() {
        ctx.output.http_header(&name, &value);
    }

    Ok(())
}

fn build(args: &HeaderArgs, ctx: &Context) -> Result<CacheControl> {
    let preset = Preset::from(args.preset);
    let options = args.options();

    ctx.output.debug(&format!("Building {} policy from {:?}", preset.as_str(), options));

    NamedPolicy::new(preset, options)
        .build(ctx.config.default_ttl())
        .with_context(|| format!("Invalid {} policy", preset.as_str()))
}
