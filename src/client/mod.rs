//! Opening handshake driver.
//!
//! Writes the upgrade request to a [`Transport`] and reads the response
//! through an [`OpeningHandshakeParser`] until the header section ends.

use bytes::{Buf, BytesMut};

use crate::config::HandshakeConfig;
use crate::crypto::CryptoProvider;
use crate::error::Error;
use crate::handshake::{HandshakeKey, OpeningHandshakeParser};
use crate::tokenizer::HeaderTokenizer;
use crate::transport::Transport;
use crate::Result;

/// A transport whose opening handshake the server accepted.
#[derive(Debug)]
pub struct Connection<T> {
    pub transport: T,
    /// Bytes that arrived after the response head: the start of the frame stream.
    pub leftover: BytesMut,
    pub key: HandshakeKey,
}

/// Perform the opening handshake described by `config` over `transport`.
///
/// The key is drawn from `crypto`. Fails with [`Error::Handshake`] when the
/// server rejects or botches the handshake and [`Error::Disconnected`] when the
/// stream ends first. There is no retry.
pub async fn connect<T, C>(
    transport: T,
    config: &HandshakeConfig,
    crypto: &C,
) -> Result<Connection<T>>
where
    T: Transport,
    C: CryptoProvider + ?Sized,
{
    let key = HandshakeKey::generate(crypto);
    let parser = OpeningHandshakeParser::from_config(key, config);
    connect_with_parser(transport, config, parser).await
}

/// Like [`connect`], with a caller-built parser (custom key or tokenizer).
pub async fn connect_with_parser<T, K>(
    mut transport: T,
    config: &HandshakeConfig,
    mut parser: OpeningHandshakeParser<K>,
) -> Result<Connection<T>>
where
    T: Transport,
    K: HeaderTokenizer,
{
    config.validate()?;
    let request = parser.build_request(config);
    transport.send(&request).await?;
    tracing::debug!(
        host = %config.host,
        port = config.port,
        path = %config.path,
        bytes = request.len(),
        "sent opening handshake"
    );

    let mut pending = BytesMut::with_capacity(config.read_chunk_size);
    let mut chunk = vec![0u8; config.read_chunk_size];
    loop {
        let n = transport.recv(&mut chunk).await?;
        if n == 0 {
            tracing::warn!(buffered = pending.len(), "connection closed during handshake");
            return Err(Error::Disconnected);
        }
        tracing::trace!(bytes = n, "handshake response chunk");
        pending.extend_from_slice(&chunk[..n]);

        let progress = parser.process_bytes(&pending);
        pending.advance(progress.consumed);
        if let Some(err) = progress.error {
            return Err(err.into());
        }
        if progress.header_end_reached {
            tracing::debug!(leftover = pending.len(), "opening handshake accepted");
            return Ok(Connection {
                transport,
                leftover: pending,
                key: parser.key().clone(),
            });
        }
    }
}
