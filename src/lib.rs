//! # ws-handshake
//!
//! Client side of the WebSocket opening handshake (RFC 6455 §4.1).
//!
//! ## Features
//!
//! - Upgrade request generation with a fresh `Sec-WebSocket-Key`
//! - Incremental response parsing over arbitrarily fragmented input
//! - `Sec-WebSocket-Accept` proof check and the other §4.1 acceptance rules
//! - Pluggable crypto ([`CryptoProvider`]) and HTTP tokenizer ([`HeaderTokenizer`])
//! - An async driver over any tokio byte stream
//!
//! ## Example
//!
//! ```ignore
//! use ws_handshake::{connect, HandshakeConfig, SystemCrypto};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let stream = tokio::net::TcpStream::connect("127.0.0.1:9001").await?;
//!     let config = HandshakeConfig::new("127.0.0.1", 9001).with_path("chat");
//!     let conn = connect(stream, &config, &SystemCrypto).await?;
//!     // Hand conn.transport and conn.leftover to the framing layer...
//!     Ok(())
//! }
//! ```
//!
//! Without a runtime, drive [`OpeningHandshakeParser`] directly: write
//! [`OpeningHandshakeParser::build_request`] and feed each chunk read back to
//! [`OpeningHandshakeParser::process_bytes`].

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handshake;
pub mod tokenizer;
pub mod transport;

pub use client::{connect, connect_with_parser, Connection};
pub use config::{ExtraHeader, HandshakeConfig};
pub use crypto::{CryptoProvider, SystemCrypto};
pub use error::{Error, ErrorCode, HandshakeError, Result};
pub use handshake::{
    build_request, HandshakeKey, OpeningHandshakeParser, Progress, RecognizedHeaderField,
};
pub use tokenizer::{BufferedTokenizer, Event, HeaderTokenizer, TokenizerError};
pub use transport::Transport;
