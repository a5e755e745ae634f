use thiserror::Error;

use crate::tokenizer::TokenizerError;

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a handshake over a transport.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("handshake: {0}")]
    Handshake(#[from] HandshakeError),

    #[error("connection closed before the handshake completed")]
    Disconnected,

    #[error("invalid config: {0}")]
    Config(String),
}

/// Outward result code of a handshake attempt.
///
/// Every failure, whether a malformed response or a rejected header, collapses
/// to `HandshakeFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCode {
    #[default]
    None,
    HandshakeFailed,
}

/// Why the server's response did not complete the opening handshake.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("malformed response: {0}")]
    Malformed(#[from] TokenizerError),

    #[error("unexpected status code {0}")]
    Status(u16),

    #[error("missing or invalid Upgrade header")]
    Upgrade,

    #[error("missing or invalid Connection header")]
    Connection,

    #[error("Sec-WebSocket-Accept does not match the sent key")]
    Accept,

    #[error("server selected an extension that was not offered")]
    Extensions,

    #[error("server selected a subprotocol that was not offered")]
    Protocol,
}

impl HandshakeError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::HandshakeFailed
    }
}
