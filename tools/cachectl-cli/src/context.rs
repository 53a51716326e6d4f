//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cachectl::PolicyConfig;

use crate::output::Output;

/// Config file names searched for, in order, in each directory.
const CONFIG_NAMES: [&str; 3] = ["cachectl.toml", ".cachectl.toml", "cachectl.json"];

/// Execution context for CLI commands.
#[derive(Debug)]
pub struct Context {
    /// Policy configuration.
    pub config: PolicyConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                find_config(&cwd)
            }
        };

        let config = match &path {
            Some(path) => PolicyConfig::load(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => PolicyConfig::default(),
        };

        if let Some(path) = &path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path: path,
            output,
        })
    }
}

/// Find a config file in `start` or its parent directories.
fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
