//! Newline-terminated reads from the instrument.

use crate::port::{PortError, SerialPortAdapter};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::trace;

const LINE_END: u8 = b'\n';

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Port(#[from] PortError),

    /// No newline arrived within the idle limit. `partial` holds whatever
    /// bytes did arrive.
    #[error("No complete line after {waited:?} ({} bytes received)", .partial.len())]
    Timeout { waited: Duration, partial: Vec<u8> },

    #[error("Response is not ASCII: {0:?}")]
    NotAscii(Vec<u8>),
}

/// Read one byte at a time until `\n`, returning the line with its newline.
///
/// "Nothing yet" answers from the port (timeouts, would-block, empty reads)
/// are polled through. With `idle_limit` of `None` that means waiting
/// forever for a silent instrument; with `Some(limit)` the read gives up once
/// `limit` passes without a new byte.
pub fn read_line<P>(port: &mut P, idle_limit: Option<Duration>) -> Result<String, ReadError>
where
    P: SerialPortAdapter + ?Sized,
{
    let mut data = Vec::new();
    let mut byte = [0u8; 1];
    let mut last_progress = Instant::now();

    loop {
        match port.read_bytes(&mut byte) {
            Ok(1) => {
                data.push(byte[0]);
                last_progress = Instant::now();
                if byte[0] == LINE_END {
                    break;
                }
                continue;
            }
            Ok(_) => {}
            Err(e) if e.is_idle() => {}
            Err(e) => return Err(e.into()),
        }

        if let Some(limit) = idle_limit {
            let waited = last_progress.elapsed();
            if waited >= limit {
                return Err(ReadError::Timeout {
                    waited,
                    partial: data,
                });
            }
        }
        std::thread::yield_now();
    }

    if !data.is_ascii() {
        return Err(ReadError::NotAscii(data));
    }
    let line = String::from_utf8(data).map_err(|e| ReadError::NotAscii(e.into_bytes()))?;
    trace!("Read line from {}: {:?}", port.name(), line);
    Ok(line)
}
