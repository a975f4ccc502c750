//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "KEITHLEY";

/// Config file name
const CONFIG_FILE_NAME: &str = "keithley.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "KEITHLEY_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `KEITHLEY_CONFIG` environment variable (explicit path)
    /// 2. `./keithley.toml` (current directory)
    /// 3. `keithley.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables override file values either way.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Load from `path` when given, otherwise resolve as [`ConfigLoader::load`].
    pub fn load_or_resolve(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render the active configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.config)?)
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        debug!("{} points at missing file {}", CONFIG_PATH_ENV, path.display());
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|path| path.exists())
}

/// Platform config file location, e.g. `~/.config/keithley-scpi/keithley.toml`.
pub fn get_default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "keithley-scpi").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Config> {
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to the configuration.
///
/// Supported: `KEITHLEY_SERIAL_PORT`, `KEITHLEY_SERIAL_BAUD_RATE`,
/// `KEITHLEY_PLAYBACK_MODE`, `KEITHLEY_PLAYBACK_IDLE_LIMIT_MS` and
/// `KEITHLEY_LOGGING_LEVEL`.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    let var = |key: &str| std::env::var(format!("{ENV_PREFIX}_{key}")).ok();

    if let Some(val) = var("SERIAL_PORT") {
        config.serial.port = val;
    }
    if let Some(val) = var("SERIAL_BAUD_RATE") {
        config.serial.baud_rate = val.parse().map_err(|_| {
            ConfigError::env_parse(format!("{ENV_PREFIX}_SERIAL_BAUD_RATE"), "not a baud rate")
        })?;
    }
    if let Some(val) = var("PLAYBACK_MODE") {
        config.playback.mode = val
            .parse()
            .map_err(|msg: String| ConfigError::env_parse(format!("{ENV_PREFIX}_PLAYBACK_MODE"), msg))?;
    }
    if let Some(val) = var("PLAYBACK_IDLE_LIMIT_MS") {
        config.playback.idle_limit_ms = Some(val.parse().map_err(|_| {
            ConfigError::env_parse(format!("{ENV_PREFIX}_PLAYBACK_IDLE_LIMIT_MS"), "not a millisecond count")
        })?);
    }
    if let Some(val) = var("LOGGING_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}

fn validate(config: &Config) -> ConfigResult<()> {
    if config.serial.port.trim().is_empty() {
        return Err(ConfigError::validation("serial.port", "must not be empty"));
    }
    if config.serial.baud_rate == 0 {
        return Err(ConfigError::validation("serial.baud_rate", "must be positive"));
    }
    if config.probe.query.trim().is_empty() {
        return Err(ConfigError::validation("probe.query", "must not be empty"));
    }
    Ok(())
}
