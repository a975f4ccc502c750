//! Decoders for instrument replies.
//!
//! A script line names its decoder with `@TAG`. The set of decoders is closed;
//! unknown names are kept so the failure can say which tag was wrong.

use std::fmt;
use std::io::Write;
use thiserror::Error;

/// Errors raised while decoding a reply.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The script asked for a decoder that does not exist.
    #[error("This parser is not implemented: {0}")]
    Unimplemented(String),

    /// A comma-separated field was not a number.
    #[error("Could not convert '{token}' to a number: {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Writing the rendered output failed.
    #[error("Failed to write parsed output: {0}")]
    Output(#[from] std::io::Error),
}

/// Decoder selected by a script's `@TAG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserTag {
    /// `IV`: alternating voltage, current values.
    Iv,
    /// Any other name, including the empty one.
    Unknown(String),
}

impl From<&str> for ParserTag {
    fn from(name: &str) -> Self {
        match name {
            "IV" => Self::Iv,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ParserTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iv => f.write_str("IV"),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}

impl ParserTag {
    /// Decode `response` and print the result to `out`.
    ///
    /// Returns how many records were rendered.
    pub fn apply<W: Write>(&self, response: &str, out: &mut W) -> Result<usize, ResponseError> {
        match self {
            Self::Iv => {
                let samples = parse_iv(response)?;
                for sample in &samples {
                    writeln!(out, "{sample}")?;
                }
                Ok(samples.len())
            }
            Self::Unknown(name) => Err(ResponseError::Unimplemented(name.clone())),
        }
    }
}

/// One voltage/current pair from a sweep reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvSample {
    pub voltage: f64,
    pub current: f64,
}

impl fmt::Display for IvSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>10}  {:>10}",
            sci_notation(self.voltage),
            sci_notation(self.current)
        )
    }
}

/// Split a `V,I,V,I,...` reply into samples.
///
/// A trailing voltage without a matching current is dropped.
pub fn parse_iv(response: &str) -> Result<Vec<IvSample>, ResponseError> {
    let mut voltages = Vec::new();
    let mut currents = Vec::new();

    for (i, token) in response.split(',').enumerate() {
        let token = token.trim();
        let value: f64 = token.parse().map_err(|source| ResponseError::InvalidNumber {
            token: token.to_string(),
            source,
        })?;
        if i % 2 == 0 {
            voltages.push(value);
        } else {
            currents.push(value);
        }
    }

    Ok(voltages
        .into_iter()
        .zip(currents)
        .map(|(voltage, current)| IvSample { voltage, current })
        .collect())
}

/// `+d.ddddde+XX`: explicit sign, five decimals, signed two-digit exponent.
fn sci_notation(value: f64) -> String {
    if value.is_nan() {
        return "+nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+inf" } else { "-inf" }.to_string();
    }

    // Rust renders `1.00000e-3`; pad the exponent to the usual form.
    let raw = format!("{:+.5e}", value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => raw,
    }
}
