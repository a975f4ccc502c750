//! Command-line flags shared by both binaries.

use crate::config::{ConfigLoader, ConfigResult};
use clap::Parser;
use std::path::PathBuf;

/// Without flags the tools run with their built-in settings.
#[derive(Parser, Debug, Default)]
#[command(version)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Args {
    /// Load configuration and fold the flags into it.
    pub fn resolve(&self) -> ConfigResult<ConfigLoader> {
        let mut loader = ConfigLoader::load_or_resolve(self.config.as_deref())?;
        if let Some(level) = &self.log_level {
            loader.config.logging.level = level.clone();
        }
        Ok(loader)
    }
}
