//! Command script preprocessing.
//!
//! A script is plain text, one SCPI command per line. `#` starts a comment
//! that runs to the end of the line, and a trailing `@NAME` names the parser
//! applied to the instrument's reply:
//!
//! ```text
//! *RST              # reset
//! :READ? @IV        # read back the sweep as voltage/current pairs
//! ```

use crate::response::ParserTag;
use std::fmt;

/// Sweep script compiled into the player.
pub const EMBEDDED_SCRIPT: &str = include_str!("../scripts/sweep.scpi");

/// One command of a parsed script.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Command text including the terminating `\n`.
    pub command: String,
    /// Parser for the reply, if the line carried an `@` marker.
    pub parser: Option<ParserTag>,
}

impl Instruction {
    pub fn new(command: impl Into<String>, parser: Option<ParserTag>) -> Self {
        Self {
            command: command.into(),
            parser,
        }
    }

    /// Wire bytes for this command.
    pub fn as_bytes(&self) -> &[u8] {
        self.command.as_bytes()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command.trim_end_matches('\n'))?;
        if let Some(tag) = &self.parser {
            write!(f, " @{tag}")?;
        }
        Ok(())
    }
}

/// Drop everything from the first `#` and trim the rest.
///
/// Applying it twice gives the same result as applying it once.
pub fn strip_line(line: &str) -> &str {
    let code = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    code.trim()
}

/// Split one cleaned line into an instruction.
///
/// Only the first `@` separates command from tag; a bare trailing `@` gives an
/// empty tag, which is distinct from having none.
pub fn parse_line(line: &str) -> Instruction {
    match line.split_once('@') {
        None => Instruction::new(format!("{line}\n"), None),
        Some((command, tag)) => Instruction::new(
            format!("{}\n", command.trim()),
            Some(ParserTag::from(tag.trim())),
        ),
    }
}

/// Turn script text into the ordered list of instructions it contains.
///
/// Blank and comment-only lines produce nothing. No command syntax is
/// checked; whatever remains is sent to the instrument verbatim.
pub fn parse_script(text: &str) -> Vec<Instruction> {
    text.lines()
        .map(strip_line)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}
