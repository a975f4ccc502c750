//! Configuration for the probe and the script player.
//!
//! Both tools run without any configuration; a TOML file only exists to point
//! them at a different port or to change playback behaviour.
//!
//! # Configuration Resolution
//!
//! 1. `KEITHLEY_CONFIG` environment variable (explicit path)
//! 2. `./keithley.toml` (current directory)
//! 3. `keithley.toml` in the platform config directory
//! 4. Built-in defaults (no file required)
//!
//! `KEITHLEY_<SECTION>_<KEY>` environment variables override file values,
//! e.g. `KEITHLEY_SERIAL_PORT=/dev/ttyUSB0`.
//!
//! # Example
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//!
//! [playback]
//! mode = "full"
//! script = "iv_sweep.scpi"
//! idle_limit_ms = 5000
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{
    Config, LogFormat, LoggingConfig, PlaybackConfig, PlaybackMode, ProbeConfig, SerialConfig,
};
