//! PFCP Error Types
//!
//! Error types for N4 header and IE decoding.

use thiserror::Error;

/// PFCP Error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PfcpError {
    /// Buffer too short for operation
    #[error("Buffer too short: needed {needed} bytes, available {available}")]
    BufferTooShort { needed: usize, available: usize },

    /// Length field smaller than the header it belongs to
    #[error("Invalid message length {length} for {header_len}-byte header")]
    InvalidLength { length: u16, header_len: usize },

    /// Invalid message type
    #[error("Invalid message type: {0}")]
    InvalidMessageType(u8),

    /// Invalid IE type
    #[error("Invalid IE type: {0}")]
    InvalidIeType(u16),

    /// Invalid cause value
    #[error("Invalid cause value: {0}")]
    InvalidCause(u8),

    /// Invalid node ID type
    #[error("Invalid node ID type: {0}")]
    InvalidNodeIdType(u8),

    /// Decoding error
    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// PFCP Result type
pub type PfcpResult<T> = Result<T, PfcpError>;
