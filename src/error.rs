//! Error types for Chateau
//!
//! Provides a unified error type for all server-side operations. Handler
//! business errors are a separate type, [`HandlerError`], because they are
//! the only failures that reach the wire.

use thiserror::Error;

/// Result type alias using ChateauError
pub type Result<T> = std::result::Result<T, ChateauError>;

/// Error returned by handler code; written to the peer as `error: <message>`
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for Chateau operations
#[derive(Debug, Error)]
pub enum ChateauError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Startup Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server is already running")]
    AlreadyRunning,

    #[error("Handler registered twice: {0}")]
    DuplicateHandler(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Handshake failed: {0}")]
    Handshake(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Frame exceeds {limit} bytes without a delimiter")]
    FrameTooLarge { limit: usize },

    #[error("Unknown handler {0}")]
    HandlerNotFound(String),

    /// `len` is the payload end, delimiter excluded
    #[error("Incorrect message: payload offset {offset} leaves no payload before byte {len}")]
    MalformedMessage { offset: usize, len: usize },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Marshal error: {0}")]
    Marshal(String),

    // -------------------------------------------------------------------------
    // Internal Errors
    // -------------------------------------------------------------------------
    #[error("Internal error: {0}")]
    Internal(String),
}
