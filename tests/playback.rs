//! End-to-end playback against a mock instrument.

mod common;

use common::{mock_instrument, output_text, sweep_reply, TEST_IDLE_LIMIT};
use keithley_scpi::{
    parse_script, AppError, PlaybackMode, Player, ReadError, ResponseError,
};
use pretty_assertions::assert_eq;

fn player(
    port: &keithley_scpi::MockSerialPort,
    mode: PlaybackMode,
) -> Player<keithley_scpi::MockSerialPort, Vec<u8>> {
    Player::new(port.clone(), Vec::new())
        .with_mode(mode)
        .with_idle_limit(Some(TEST_IDLE_LIMIT))
}

#[test]
fn reset_then_read_halts_after_reset() {
    let port = mock_instrument(&["\n", "1.0,0.01\n"]);
    let script = parse_script("*RST\n:READ? @IV\n");

    let report = player(&port, PlaybackMode::FirstOnly).play(&script).unwrap();

    assert_eq!(port.get_write_log(), vec![b"*RST\n".to_vec()]);
    assert_eq!(report.lines_read, 1);
    assert_eq!(report.skipped, 1);
    // The :READ? reply is never consumed.
    assert_eq!(port.available_bytes(), "1.0,0.01\n".len());
}

#[test]
fn full_sweep_script() {
    let points = [(0.0, 1.0e-9), (1.0, 2.5e-6), (2.0, 5.0e-6)];
    let port = mock_instrument(&["\n", "\n", &sweep_reply(&points), "\n"]);
    let script = parse_script(
        "# sweep\n\
         *RST\n\
         :SOUR:FUNC VOLT        # voltage source\n\
         :READ? @IV\n\
         :OUTP OFF\n",
    );

    let mut player = player(&port, PlaybackMode::Full);
    let report = player.play(&script).unwrap();
    let (_, out) = player.into_parts();

    assert_eq!(
        port.written_text(),
        "*RST\n:SOUR:FUNC VOLT\n:READ?\n:OUTP OFF\n"
    );
    assert_eq!(report.commands_sent, 4);
    assert_eq!(report.records_decoded, 3);

    let text = output_text(out);
    assert!(text.contains("==>:READ?\n"));
    assert!(text.contains("+0.00000e+00  +1.00000e-09\n"));
    assert!(text.contains("+1.00000e+00  +2.50000e-06\n"));
    assert!(text.contains("+2.00000e+00  +5.00000e-06\n"));
}

#[test]
fn bare_at_tag_fails_as_unimplemented() {
    let port = mock_instrument(&["1.0,2.0\n"]);
    let script = parse_script(":READ? @\n");

    let err = player(&port, PlaybackMode::FirstOnly).play(&script).unwrap_err();
    match err {
        AppError::Response(ResponseError::Unimplemented(name)) => assert_eq!(name, ""),
        other => panic!("Expected unimplemented parser, got {:?}", other),
    }
}

#[test]
fn malformed_sweep_value_is_fatal() {
    let port = mock_instrument(&["1.0,+9.9E37,junk\n"]);
    let script = parse_script(":READ? @IV\n");

    let err = player(&port, PlaybackMode::Full).play(&script).unwrap_err();
    assert!(matches!(
        err,
        AppError::Response(ResponseError::InvalidNumber { ref token, .. }) if token == "junk"
    ));
}

#[test]
fn silent_instrument_reports_timeout() {
    let port = mock_instrument(&[]);
    let script = parse_script(":READ? @IV\n");

    let err = player(&port, PlaybackMode::FirstOnly).play(&script).unwrap_err();
    assert!(matches!(
        err,
        AppError::Read(ReadError::Timeout { ref partial, .. }) if partial.is_empty()
    ));
}
