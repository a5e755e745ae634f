//! Upgrade request serialization.

use bytes::{BufMut, BytesMut};

use super::key::HandshakeKey;
use crate::config::ExtraHeader;

/// Serialize the GET/Upgrade request carrying `key`.
///
/// `path` is written after a `/` the request line supplies. An empty `query`
/// emits no `?`. Header names and values are written as given.
pub fn build_request(
    key: &HandshakeKey,
    host: &str,
    port: u16,
    path: &str,
    query: &str,
    extra_headers: &[ExtraHeader],
) -> BytesMut {
    let mut out = BytesMut::with_capacity(192 + path.len() + query.len() + host.len());

    out.put_slice(b"GET /");
    out.put_slice(path.as_bytes());
    if !query.is_empty() {
        out.put_u8(b'?');
        out.put_slice(query.as_bytes());
    }
    out.put_slice(b" HTTP/1.1\r\n");

    out.put_slice(b"Host: ");
    out.put_slice(host.as_bytes());
    out.put_u8(b':');
    out.put_slice(port.to_string().as_bytes());
    out.put_slice(b"\r\n");

    out.put_slice(b"Upgrade: websocket\r\n");
    out.put_slice(b"Connection: Upgrade\r\n");

    out.put_slice(b"Sec-WebSocket-Key:");
    out.put_slice(key.encoded_key().as_bytes());
    out.put_slice(b"\r\n");

    out.put_slice(b"Sec-WebSocket-Version: 13\r\n");

    for header in extra_headers {
        out.put_slice(header.name.as_bytes());
        out.put_u8(b':');
        out.put_slice(header.value.as_bytes());
        out.put_slice(b"\r\n");
    }

    out.put_slice(b"\r\n");
    out
}
