//! Error types for Crossbar.

use thiserror::Error;

/// Result type alias using Crossbar's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Crossbar operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A malformed argument or refused operation.
    #[error("invalid operation: {0}")]
    Invalid(String),

    /// A port mutation was attempted after the ports were frozen.
    #[error("ports are frozen")]
    Busy,

    /// A malformed port-count, processing, or flow-code specifier.
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration failed.
    #[error("configuration failed: {0}")]
    Configure(String),

    /// Initialization failed.
    #[error("initialization failed: {0}")]
    Initialize(String),

    /// An LLRPC command number the element does not understand.
    #[error("unknown llrpc command {0:#010x}")]
    UnknownCommand(u32),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
