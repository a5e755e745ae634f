//! Client nonce and the `Sec-WebSocket-Accept` value it implies.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::crypto::CryptoProvider;

/// GUID appended to the key before hashing (RFC 6455 §1.3).
pub const WEBSOCKET_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 16;

/// Key material for one handshake attempt. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeKey {
    nonce: [u8; NONCE_LEN],
    encoded_key: String,
    expected_accept: String,
}

impl HandshakeKey {
    /// Draw a fresh nonce from `crypto` and derive the key and expected accept value.
    pub fn generate<C: CryptoProvider + ?Sized>(crypto: &C) -> Self {
        let mut nonce = [0u8; NONCE_LEN];
        crypto.fill_random(&mut nonce);
        let key = Self::from_nonce(crypto, nonce);
        tracing::debug!(
            nonce = %hex::encode(nonce),
            key = %key.encoded_key,
            "generated handshake key"
        );
        key
    }

    /// Derive the key from a known nonce, hashing with `crypto`.
    pub fn from_nonce<C: CryptoProvider + ?Sized>(crypto: &C, nonce: [u8; NONCE_LEN]) -> Self {
        let encoded_key = STANDARD.encode(nonce);
        let expected_accept = accept_for_key(crypto, &encoded_key);
        Self {
            nonce,
            encoded_key,
            expected_accept,
        }
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Value sent as `Sec-WebSocket-Key`.
    pub fn encoded_key(&self) -> &str {
        &self.encoded_key
    }

    /// Value the server must answer with in `Sec-WebSocket-Accept`.
    pub fn expected_accept(&self) -> &str {
        &self.expected_accept
    }
}

/// base64(SHA-1(key + GUID)).
pub fn accept_for_key<C: CryptoProvider + ?Sized>(crypto: &C, encoded_key: &str) -> String {
    let mut input = Vec::with_capacity(encoded_key.len() + WEBSOCKET_GUID.len());
    input.extend_from_slice(encoded_key.as_bytes());
    input.extend_from_slice(WEBSOCKET_GUID.as_bytes());
    STANDARD.encode(crypto.sha1_digest(&input))
}
