//! cachectl - Command line tool for Cache-Control policies.
//!
//! Commands:
//! - `cachectl header` - Render the headers for a preset
//! - `cachectl policies` - List named policies from the config file
//! - `cachectl check` - Validate every named policy

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, HeaderArgs, PoliciesArgs};

/// cachectl - Render and check Cache-Control policies
#[derive(Parser)]
#[command(name = "cachectl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the headers a preset produces
    Header(HeaderArgs),

    /// List named policies from the config file
    Policies(PoliciesArgs),

    /// Validate every named policy in the config file
    Check(CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Header(args) => commands::header::run(args, &ctx),
        Commands::Policies(args) => commands::policies::run(args, &ctx),
        Commands::Check(args) => commands::check::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
