//! Shared test utilities for the driver tests.

#![allow(dead_code)]

use keithley_scpi::port::MockSerialPort;
use std::time::Duration;

/// Idle limit used by tests so a missing reply fails instead of hanging.
pub const TEST_IDLE_LIMIT: Duration = Duration::from_millis(100);

/// Create a mock instrument that answers with the given lines, in order.
///
/// # Example
/// ```ignore
/// let mock = mock_instrument(&["57600\n", "57600\n"]);
/// ```
pub fn mock_instrument(replies: &[&str]) -> MockSerialPort {
    let mut mock = MockSerialPort::new("/dev/tty.mock");
    for reply in replies {
        mock.enqueue_read(reply.as_bytes());
    }
    mock
}

/// Format a sweep reply the way the 2410 does with `:FORM:ELEM VOLT,CURR`.
pub fn sweep_reply(points: &[(f64, f64)]) -> String {
    let fields: Vec<String> = points
        .iter()
        .flat_map(|(v, i)| [format!("{v:+.6E}"), format!("{i:+.6E}")])
        .collect();
    format!("{}\n", fields.join(","))
}

/// Captured stdout-equivalent as text.
pub fn output_text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("driver output should be UTF-8")
}
