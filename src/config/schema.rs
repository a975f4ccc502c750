//! Configuration schema definitions.
//!
//! Every section defaults to the fixed settings the tools were written
//! against, so an absent or empty file changes nothing.

use crate::port::{DataBits, FlowControl, Parity, PortConfiguration, StopBits};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial link to the instrument
    pub serial: SerialConfig,
    /// Probe tool settings
    pub probe: ProbeConfig,
    /// Script player settings
    pub playback: PlaybackConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Serial link section. Timeouts live with each tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path of the USB-serial adapter
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        let line = PortConfiguration::default();
        Self {
            port: "/dev/tty.usbserial".to_string(),
            baud_rate: line.baud_rate,
            data_bits: line.data_bits,
            parity: line.parity,
            stop_bits: line.stop_bits,
            flow_control: line.flow_control,
        }
    }
}

impl SerialConfig {
    /// Line settings with the given timeout.
    pub fn port_configuration(&self, timeout: Duration) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            flow_control: self.flow_control,
            parity: self.parity,
            stop_bits: self.stop_bits,
            timeout,
        }
    }
}

/// Probe tool section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Query sent on every round, newline appended if missing
    pub query: String,
    /// Number of query/response rounds
    pub repeat: u32,
    /// Read/write timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            query: ":SYST:COMM:SER:BAUD?\n".to_string(),
            repeat: 10,
            timeout_ms: 1000,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The query as sent on the wire.
    pub fn query_line(&self) -> String {
        if self.query.ends_with('\n') {
            self.query.clone()
        } else {
            format!("{}\n", self.query)
        }
    }
}

/// How far the player gets through a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Run the first instruction, reading its reply twice when tagged, then stop
    #[default]
    FirstOnly,
    /// Run every instruction with one reply each
    Full,
}

impl std::str::FromStr for PlaybackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first_only" | "first-only" => Ok(Self::FirstOnly),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown playback mode '{other}'")),
        }
    }
}

/// Script player section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub mode: PlaybackMode,
    /// Port timeout in milliseconds; 0 makes reads return immediately
    pub timeout_ms: u64,
    /// Give up on a reply after this long without a byte; unset waits forever
    pub idle_limit_ms: Option<u64>,
    /// Script file to play instead of the built-in sweep
    pub script: Option<PathBuf>,
}

impl PlaybackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn idle_limit(&self) -> Option<Duration> {
        self.idle_limit_ms.map(Duration::from_millis)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset: "trace" .. "error"
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.serial.port, "/dev/tty.usbserial");
        assert_eq!(config.serial.baud_rate, 57600);
        assert_eq!(config.serial.parity, Parity::Odd);
        assert_eq!(config.serial.flow_control, FlowControl::Software);
        assert_eq!(config.probe.repeat, 10);
        assert_eq!(config.probe.timeout(), Duration::from_secs(1));
        assert_eq!(config.playback.mode, PlaybackMode::FirstOnly);
        assert_eq!(config.playback.timeout(), Duration::ZERO);
        assert_eq!(config.playback.idle_limit(), None);
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[serial]"));
        assert!(toml_str.contains("parity = \"odd\""));
        assert!(toml_str.contains("mode = \"first_only\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [serial]
            port = "/dev/ttyUSB0"

            [playback]
            mode = "full"
            idle_limit_ms = 2500
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.playback.mode, PlaybackMode::Full);
        assert_eq!(config.playback.idle_limit(), Some(Duration::from_millis(2500)));
        // Untouched sections keep their defaults
        assert_eq!(config.serial.baud_rate, 57600);
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn test_query_line_appends_newline() {
        let probe = ProbeConfig {
            query: "*IDN?".to_string(),
            ..Default::default()
        };
        assert_eq!(probe.query_line(), "*IDN?\n");
        assert_eq!(ProbeConfig::default().query_line(), ":SYST:COMM:SER:BAUD?\n");
    }

    #[test]
    fn test_playback_mode_from_str() {
        assert_eq!("full".parse::<PlaybackMode>(), Ok(PlaybackMode::Full));
        assert_eq!("First-Only".parse::<PlaybackMode>(), Ok(PlaybackMode::FirstOnly));
        assert!("all".parse::<PlaybackMode>().is_err());
    }
}
