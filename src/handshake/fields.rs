//! Per-field accumulation of the response headers the handshake cares about.

use bytes::BytesMut;

/// Response headers that take part in validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecognizedHeaderField {
    Accept,
    Upgrade,
    Connection,
    Protocol,
    Extensions,
    #[default]
    Unrecognized,
}

const RECOGNIZED: [(&[u8], RecognizedHeaderField); 5] = [
    (b"Sec-WebSocket-Accept", RecognizedHeaderField::Accept),
    (b"Upgrade", RecognizedHeaderField::Upgrade),
    (b"Connection", RecognizedHeaderField::Connection),
    (b"Sec-WebSocket-Protocol", RecognizedHeaderField::Protocol),
    (b"Sec-WebSocket-Extensions", RecognizedHeaderField::Extensions),
];

impl RecognizedHeaderField {
    /// Match a header name against the recognized names.
    ///
    /// Case-insensitive, and a name only has to start with the known literal:
    /// `Upgrade-Insecure-Requests` classifies as `Upgrade`.
    pub fn classify(name: &[u8]) -> Self {
        RECOGNIZED
            .iter()
            .find(|(literal, _)| {
                name.len() >= literal.len() && name[..literal.len()].eq_ignore_ascii_case(literal)
            })
            .map(|(_, field)| *field)
            .unwrap_or(Self::Unrecognized)
    }

    fn slot(self) -> Option<usize> {
        match self {
            Self::Accept => Some(0),
            Self::Upgrade => Some(1),
            Self::Connection => Some(2),
            Self::Protocol => Some(3),
            Self::Extensions => Some(4),
            Self::Unrecognized => None,
        }
    }
}

/// Collects value bytes for each recognized field as tokens stream in.
///
/// Repeated headers with the same recognized name are concatenated.
#[derive(Debug, Default)]
pub struct HeaderAccumulator {
    current: RecognizedHeaderField,
    name: BytesMut,
    reading_name: bool,
    values: [BytesMut; 5],
}

impl HeaderAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name bytes. Consecutive calls extend the same name.
    pub fn on_field(&mut self, chunk: &[u8]) {
        if !self.reading_name {
            self.name.clear();
            self.reading_name = true;
        }
        self.name.extend_from_slice(chunk);
        self.current = RecognizedHeaderField::classify(&self.name);
        tracing::trace!(field = ?self.current, "header field");
    }

    /// Value bytes for the current field. Dropped when the field is unrecognized.
    pub fn on_value(&mut self, chunk: &[u8]) {
        self.reading_name = false;
        if let Some(slot) = self.current.slot() {
            self.values[slot].extend_from_slice(chunk);
        }
    }

    pub fn current(&self) -> RecognizedHeaderField {
        self.current
    }

    /// Accumulated value of `field`; empty when absent or unrecognized.
    pub fn value(&self, field: RecognizedHeaderField) -> &[u8] {
        match field.slot() {
            Some(slot) => &self.values[slot],
            None => &[],
        }
    }
}
