//! RFC 6455 §4.1 acceptance rules for the server's response.

use super::fields::RecognizedHeaderField;
use super::key::HandshakeKey;
use super::HandshakeState;
use crate::error::HandshakeError;

/// Check the accumulated response once the header section has ended.
///
/// A failure already latched (bad status, malformed head) is returned as is.
pub(crate) fn validate(state: &HandshakeState, key: &HandshakeKey) -> Option<HandshakeError> {
    debug_assert!(state.header_end_reached);
    if let Some(err) = &state.error {
        return Some(err.clone());
    }

    let fields = &state.fields;
    let upgrade = fields.value(RecognizedHeaderField::Upgrade);
    if !matches_either_casing(upgrade, b"websocket", b"WEBSOCKET") {
        return Some(HandshakeError::Upgrade);
    }
    let connection = fields.value(RecognizedHeaderField::Connection);
    if !matches_either_casing(connection, b"upgrade", b"UPGRADE") {
        return Some(HandshakeError::Connection);
    }
    if fields.value(RecognizedHeaderField::Accept) != key.expected_accept().as_bytes() {
        return Some(HandshakeError::Accept);
    }
    // No extensions or subprotocols are offered, so none may be selected.
    if !fields.value(RecognizedHeaderField::Extensions).is_empty() {
        return Some(HandshakeError::Extensions);
    }
    if !fields.value(RecognizedHeaderField::Protocol).is_empty() {
        return Some(HandshakeError::Protocol);
    }
    None
}

/// Every byte of `value` must equal the byte at the same position in `lower`
/// or in `upper`, and the lengths must agree.
///
/// This compares against two fixed casings position by position rather than
/// folding case. A token list such as `keep-alive, Upgrade` does not match.
pub(crate) fn matches_either_casing(value: &[u8], lower: &[u8], upper: &[u8]) -> bool {
    !value.is_empty()
        && value.len() == lower.len()
        && value
            .iter()
            .zip(lower.iter().zip(upper))
            .all(|(c, (l, u))| c == l || c == u)
}
