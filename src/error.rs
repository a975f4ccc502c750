use crate::config::ConfigError;
use crate::port::PortError;
use crate::reader::ReadError;
use crate::response::ResponseError;
use thiserror::Error;

/// Unified application error type.
///
/// Everything the two drivers can fail with; none of it is recovered from.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("A serial port error occurred: {0}")]
    Port(#[from] PortError),

    #[error("Failed to read a response: {0}")]
    Read(#[from] ReadError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("Failed to load script '{path}': {source}")]
    Script {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for driver operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unimplemented_parser_passes_through() {
        let err: AppError = ResponseError::Unimplemented("XY".to_string()).into();
        assert_eq!(err.to_string(), "This parser is not implemented: XY");
    }

    #[test]
    fn test_port_error_conversion() {
        let err: AppError = PortError::not_found("/dev/tty.usbserial").into();
        assert!(matches!(err, AppError::Port(PortError::NotFound(_))));
        assert!(err.to_string().contains("/dev/tty.usbserial"));
    }
}
