//! Mock serial port implementation for testing.
//!
//! `MockSerialPort` stands in for the instrument: tests queue the bytes the
//! instrument would send back and inspect what the drivers wrote.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes returned by read operations.
    read_queue: VecDeque<u8>,
    /// Every write, in order.
    write_log: Vec<Vec<u8>>,
    /// Upper bound on bytes handed out per read call (0 = unlimited).
    read_chunk: usize,
    should_timeout: bool,
    output_flushes: usize,
}

/// Duration reported by simulated timeouts.
const MOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Mock serial port implementation for testing.
///
/// Clones share state, so a test can hand one clone to a driver and keep the
/// other to inspect the traffic afterwards.
///
/// # Example
/// ```
/// use keithley_scpi::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"57600\n");
///
/// port.write_bytes(b":SYST:COMM:SER:BAUD?\n").unwrap();
/// let mut buffer = [0u8; 16];
/// let n = port.read_bytes(&mut buffer).unwrap();
///
/// assert_eq!(&buffer[..n], b"57600\n");
/// assert_eq!(port.written_text(), ":SYST:COMM:SER:BAUD?\n");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    // A poisoned lock only happens after a panicking test, so keep going.
    fn lock(&self) -> MutexGuard<'_, MockPortState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append bytes to the read queue.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.lock().read_queue.extend(data);
    }

    /// Hand out at most `chunk` bytes per read call.
    pub fn set_read_chunk(&mut self, chunk: usize) {
        self.lock().read_chunk = chunk;
    }

    /// Make the next read or write fail with a timeout.
    pub fn set_should_timeout(&mut self, should_timeout: bool) {
        self.lock().should_timeout = should_timeout;
    }

    /// Copy of every write performed so far.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.lock().write_log.clone()
    }

    /// All written bytes concatenated and decoded lossily.
    pub fn written_text(&self) -> String {
        let state = self.lock();
        let bytes: Vec<u8> = state.write_log.iter().flatten().copied().collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Number of `flush_output` calls.
    pub fn output_flushes(&self) -> usize {
        self.lock().output_flushes
    }

    /// Bytes still waiting in the read queue.
    pub fn available_bytes(&self) -> usize {
        self.lock().read_queue.len()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.lock();

        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(MOCK_TIMEOUT));
        }

        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.lock();

        if state.should_timeout {
            state.should_timeout = false;
            return Err(PortError::timeout(MOCK_TIMEOUT));
        }

        let limit = match state.read_chunk {
            0 => buffer.len(),
            chunk => chunk.min(buffer.len()),
        };

        let mut bytes_read = 0;
        for byte in buffer.iter_mut().take(limit) {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 && !buffer.is_empty() {
            // Same thing a zero-timeout hardware port reports.
            Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "No data available",
            )))
        } else {
            Ok(bytes_read)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn flush_output(&mut self) -> Result<(), PortError> {
        self.lock().output_flushes += 1;
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
