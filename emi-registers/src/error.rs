use crate::codec::Address;
use thiserror::Error;

/// Failure reported by the register transport.
///
/// Surfaced unchanged by the decoders; this layer performs no retries.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("modbus client error: {0}")]
    Modbus(#[from] tokio_modbus::Error),

    #[error("device answered with exception {0:?}")]
    Exception(tokio_modbus::Exception),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single decode call.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("short read at address {address:#06x}: expected {expected} bytes, got {actual}")]
    PartialRead {
        address: Address,
        expected: usize,
        actual: usize,
    },
}

impl DecodeError {
    pub fn is_transport(&self) -> bool {
        matches!(self, DecodeError::Transport(_))
    }
}

/// Error raised while loading or validating a data load configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid register address `{0}`")]
    InvalidAddress(String),

    #[error("data load name `{0}` is not unique")]
    DuplicateName(String),

    #[error("string data load `{0}` has no `Length`")]
    MissingLength(String),
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type TransportResult<T> = Result<T, TransportError>;
