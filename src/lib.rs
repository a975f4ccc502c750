//! Keithley 2410 serial tools.
//!
//! Two drivers share this library: a probe that repeats one query and prints
//! the raw replies, and a script player that sends a list of SCPI commands
//! and decodes tagged replies.
//!
//! # Modules
//!
//! - `port`: Serial port abstraction (hardware and mock)
//! - `script`: Script text to instruction list
//! - `reader`: Newline-terminated reads
//! - `response`: Reply decoders selected by script tags
//! - `player`: Script playback driver
//! - `probe`: Query probe driver
//! - `config`: TOML configuration with environment overrides
//! - `cli`, `logging`: Shared binary plumbing
//! - `error`: Unified error handling

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod player;
pub mod port;
pub mod probe;
pub mod reader;
pub mod response;
pub mod script;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult};
pub use player::{PlaybackReport, Player};
pub use port::{MockSerialPort, PortConfiguration, PortError, SerialPortAdapter, SyncSerialPort};
pub use reader::{read_line, ReadError};
pub use response::{parse_iv, IvSample, ParserTag, ResponseError};
pub use script::{parse_script, Instruction};

pub use config::{Config, ConfigError, ConfigLoader, PlaybackMode};
