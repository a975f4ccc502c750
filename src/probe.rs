//! Connectivity probe: send one query repeatedly and print the raw replies.

use crate::config::Config;
use crate::error::AppResult;
use crate::port::{SerialPortAdapter, SyncSerialPort};
use crate::reader::{read_line, ReadError};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Write `query` `repeat` times, reading and printing one line after each.
///
/// Replies are returned in order, newline included. `timeout` bounds each
/// wait for a reply; a reply that does not complete in time is kept as
/// whatever arrived (possibly nothing) and the next round still runs.
pub fn run_probe<P, W>(
    port: &mut P,
    query: &str,
    repeat: u32,
    timeout: Duration,
    out: &mut W,
) -> AppResult<Vec<String>>
where
    P: SerialPortAdapter + ?Sized,
    W: Write,
{
    info!("Probing {} with {:?} x{}", port.name(), query, repeat);
    writeln!(out, "-----------")?;
    writeln!(out, "{query}")?;
    writeln!(out, "-----------")?;

    let mut replies = Vec::with_capacity(repeat as usize);
    for round in 1..=repeat {
        port.write_all_bytes(query.as_bytes())?;
        let line = match read_line(&mut *port, Some(timeout)) {
            Ok(line) => line,
            Err(ReadError::Timeout { waited, partial }) => {
                warn!("Round {}: no complete reply after {:?}", round, waited);
                String::from_utf8_lossy(&partial).into_owned()
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Round {}: {:?}", round, line);
        writeln!(out, "{line}")?;
        replies.push(line);
    }

    writeln!(out, "-----------")?;
    out.flush()?;
    Ok(replies)
}

/// Open the instrument port with the probe timeout and run the probe,
/// printing to stdout. The port is closed on return.
pub fn probe_from_config(config: &Config) -> AppResult<Vec<String>> {
    let timeout = config.probe.timeout();
    let line = config.serial.port_configuration(timeout);
    let mut port = SyncSerialPort::open(&config.serial.port, line)?;
    info!("Port open: {:?}", port);

    let mut stdout = std::io::stdout().lock();
    run_probe(
        &mut port,
        &config.probe.query_line(),
        config.probe.repeat,
        timeout,
        &mut stdout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::{MockSerialPort, PortError};

    #[test]
    fn test_ten_rounds() {
        let mut port = MockSerialPort::new("MOCK0");
        for _ in 0..10 {
            port.enqueue_read(b"57600\n");
        }

        let mut out = Vec::new();
        let replies = run_probe(
            &mut port,
            ":SYST:COMM:SER:BAUD?\n",
            10,
            Duration::from_millis(50),
            &mut out,
        )
        .unwrap();

        assert_eq!(replies.len(), 10);
        assert!(replies.iter().all(|r| r == "57600\n"));
        assert_eq!(port.get_write_log().len(), 10);
        assert_eq!(port.written_text(), ":SYST:COMM:SER:BAUD?\n".repeat(10));

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("57600").count(), 10);
    }

    /// Mock that answers selected rounds as they are written.
    #[derive(Debug)]
    struct Answering {
        inner: MockSerialPort,
        replies: Vec<&'static [u8]>,
        writes: usize,
    }

    impl SerialPortAdapter for Answering {
        fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
            if let Some(reply) = self.replies.get(self.writes) {
                self.inner.enqueue_read(reply);
            }
            self.writes += 1;
            self.inner.write_bytes(data)
        }

        fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
            self.inner.read_bytes(buffer)
        }

        fn name(&self) -> &str {
            self.inner.name()
        }

        fn flush_output(&mut self) -> Result<(), PortError> {
            self.inner.flush_output()
        }
    }

    #[test]
    fn test_missed_reply_does_not_stop_rounds() {
        let port = MockSerialPort::new("MOCK0");
        let mut answering = Answering {
            inner: port.clone(),
            replies: vec![b"57600\n", b"", b"57600\n"],
            writes: 0,
        };

        let mut out = Vec::new();
        let replies = run_probe(
            &mut answering,
            ":SYST:COMM:SER:BAUD?\n",
            3,
            Duration::from_millis(20),
            &mut out,
        )
        .unwrap();

        assert_eq!(replies, vec!["57600\n", "", "57600\n"]);
        assert_eq!(port.get_write_log().len(), 3);

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("57600").count(), 2);
        assert!(printed.ends_with("-----------\n"));
    }

    #[test]
    fn test_partial_reply_is_kept() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"576");

        let mut out = Vec::new();
        let replies = run_probe(&mut port, "*IDN?\n", 2, Duration::from_millis(20), &mut out)
            .unwrap();

        assert_eq!(replies, vec!["576", ""]);
        assert_eq!(port.get_write_log().len(), 2);
    }

    #[test]
    fn test_silent_instrument_still_runs_every_round() {
        let mut port = MockSerialPort::new("MOCK0");

        let mut out = Vec::new();
        let replies = run_probe(&mut port, "*IDN?\n", 4, Duration::from_millis(10), &mut out)
            .unwrap();

        assert_eq!(replies, vec![String::new(); 4]);
        assert_eq!(port.get_write_log().len(), 4);
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_should_timeout(true);

        let mut out = Vec::new();
        let err = run_probe(&mut port, "*IDN?\n", 1, Duration::from_millis(20), &mut out)
            .unwrap_err();
        assert!(matches!(err, AppError::Port(_)));
    }
}
