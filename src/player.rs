//! Script playback against the instrument.

use crate::config::{Config, PlaybackConfig, PlaybackMode};
use crate::error::{AppError, AppResult};
use crate::port::{SerialPortAdapter, SyncSerialPort};
use crate::reader::read_line;
use crate::response::ParserTag;
use crate::script::{parse_script, Instruction, EMBEDDED_SCRIPT};
use std::borrow::Cow;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// What a playback run got through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Commands written to the instrument.
    pub commands_sent: usize,
    /// Reply lines read back.
    pub lines_read: usize,
    /// Records printed by reply parsers.
    pub records_decoded: usize,
    /// Instructions left unplayed.
    pub skipped: usize,
}

/// Plays instructions over an owned port, printing decoded replies to `out`.
#[derive(Debug)]
pub struct Player<P, W> {
    port: P,
    out: W,
    mode: PlaybackMode,
    idle_limit: Option<Duration>,
}

impl<P, W> Player<P, W>
where
    P: SerialPortAdapter,
    W: Write,
{
    pub fn new(port: P, out: W) -> Self {
        Self {
            port,
            out,
            mode: PlaybackMode::default(),
            idle_limit: None,
        }
    }

    pub fn with_mode(mut self, mode: PlaybackMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bound how long a reply may stay silent; `None` waits forever.
    pub fn with_idle_limit(mut self, idle_limit: Option<Duration>) -> Self {
        self.idle_limit = idle_limit;
        self
    }

    /// Play `instructions` in order.
    ///
    /// In [`PlaybackMode::FirstOnly`] only the first instruction runs: a
    /// tagged command has its reply read and parsed twice, an untagged one
    /// has a single reply read and echoed. In [`PlaybackMode::Full`] every
    /// instruction gets one write and one reply.
    pub fn play(&mut self, instructions: &[Instruction]) -> AppResult<PlaybackReport> {
        let mut report = PlaybackReport::default();
        info!(
            "Playing {} instruction(s) on {} ({:?})",
            instructions.len(),
            self.port.name(),
            self.mode
        );

        for (index, instruction) in instructions.iter().enumerate() {
            writeln!(self.out, "==>{}", instruction.command)?;
            debug!("Sending {}", instruction);
            self.port.write_all_bytes(instruction.as_bytes())?;
            report.commands_sent += 1;

            match self.mode {
                PlaybackMode::Full => {
                    self.reply(instruction.parser.as_ref(), &mut report)?;
                }
                PlaybackMode::FirstOnly => {
                    if let Some(tag) = &instruction.parser {
                        self.reply(Some(tag), &mut report)?;
                        self.port.flush_output()?;
                    }
                    self.reply(instruction.parser.as_ref(), &mut report)?;
                    self.port.flush_output()?;

                    report.skipped = instructions.len() - index - 1;
                    info!("Stopping after first instruction, {} not played", report.skipped);
                    break;
                }
            }
        }

        self.out.flush()?;
        Ok(report)
    }

    /// Read one reply and hand it to `parser`, or echo it when untagged.
    fn reply(&mut self, parser: Option<&ParserTag>, report: &mut PlaybackReport) -> AppResult<()> {
        let line = read_line(&mut self.port, self.idle_limit)?;
        report.lines_read += 1;
        debug!("Received {:?}", line);

        match parser {
            Some(tag) => report.records_decoded += tag.apply(&line, &mut self.out)?,
            None => write!(self.out, "{line}")?,
        }
        Ok(())
    }

    /// Release the port and output sink.
    pub fn into_parts(self) -> (P, W) {
        (self.port, self.out)
    }
}

/// Script text from the configured file, or the built-in sweep.
pub fn load_script(config: &PlaybackConfig) -> AppResult<Cow<'static, str>> {
    match &config.script {
        Some(path) => {
            debug!("Loading script from {}", path.display());
            std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| AppError::Script {
                    path: path.clone(),
                    source,
                })
        }
        None => Ok(Cow::Borrowed(EMBEDDED_SCRIPT)),
    }
}

/// Parse the configured script, open the instrument port and play it,
/// printing to stdout.
pub fn play_from_config(config: &Config) -> AppResult<PlaybackReport> {
    let text = load_script(&config.playback)?;
    let instructions = parse_script(&text);
    info!("Parsed {} instruction(s)", instructions.len());

    let line = config.serial.port_configuration(config.playback.timeout());
    let port = SyncSerialPort::open(&config.serial.port, line)?;
    info!("Port open: {:?}", port);

    let mut player = Player::new(port, std::io::stdout().lock())
        .with_mode(config.playback.mode)
        .with_idle_limit(config.playback.idle_limit());
    player.play(&instructions)
}
