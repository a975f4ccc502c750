//! Port abstraction layer for serial communication.
//!
//! Provides the `SerialPortAdapter` trait, a hardware implementation on top
//! of `serialport`, and a mock for tests.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::SyncSerialPort;
pub use traits::*;
