//! Incremental parser for the server's opening handshake response.
//!
//! The parser is fed response bytes as they arrive, in chunks of any size.
//! Once the tokenizer reports the end of the header section the response is
//! validated exactly once and the outcome is latched.

mod fields;
pub mod key;
pub mod request;
mod validate;

pub use fields::{HeaderAccumulator, RecognizedHeaderField};
pub use key::{HandshakeKey, WEBSOCKET_GUID};
pub use request::build_request;

use bytes::BytesMut;

use crate::config::HandshakeConfig;
use crate::error::{ErrorCode, HandshakeError};
use crate::tokenizer::{BufferedTokenizer, Event, HeaderTokenizer};

/// What one call to [`OpeningHandshakeParser::process_bytes`] achieved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Bytes taken from the input. The rest must be fed again with the next chunk.
    pub consumed: usize,
    pub header_end_reached: bool,
    /// First failure seen so far, if any.
    pub error: Option<HandshakeError>,
}

impl Progress {
    pub fn code(&self) -> ErrorCode {
        self.error
            .as_ref()
            .map(HandshakeError::code)
            .unwrap_or(ErrorCode::None)
    }

    /// The header section ended and the server completed the handshake.
    pub fn is_accepted(&self) -> bool {
        self.header_end_reached && self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub(crate) struct HandshakeState {
    pub(crate) fields: HeaderAccumulator,
    pub(crate) header_end_reached: bool,
    pub(crate) error: Option<HandshakeError>,
}

impl HandshakeState {
    // First failure wins; later ones are dropped.
    fn fail(&mut self, err: HandshakeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn on_event(&mut self, event: Event<'_>) {
        match event {
            Event::MessageBegin | Event::MessageComplete => {}
            Event::HeaderField(_) | Event::HeaderValue(_) | Event::HeadersComplete { .. }
                if self.header_end_reached => {}
            Event::HeaderField(name) => self.fields.on_field(name),
            Event::HeaderValue(value) => self.fields.on_value(value),
            Event::HeadersComplete { status } => {
                tracing::debug!(status, "response head complete");
                // RFC 6455 §1.3: any status other than 101 means HTTP semantics still apply.
                if status != 101 {
                    self.fail(HandshakeError::Status(status));
                }
                self.header_end_reached = true;
            }
        }
    }
}

/// Client side of one opening handshake attempt.
pub struct OpeningHandshakeParser<T = BufferedTokenizer> {
    tokenizer: T,
    key: HandshakeKey,
    state: HandshakeState,
}

impl OpeningHandshakeParser {
    /// Parser using the default httparse-backed tokenizer.
    pub fn new(key: HandshakeKey) -> Self {
        Self::with_tokenizer(key, BufferedTokenizer::default())
    }

    /// Parser whose tokenizer enforces `config.max_head_bytes`.
    pub fn from_config(key: HandshakeKey, config: &HandshakeConfig) -> Self {
        Self::with_tokenizer(key, BufferedTokenizer::new(config.max_head_bytes))
    }
}

impl<T: HeaderTokenizer> OpeningHandshakeParser<T> {
    pub fn with_tokenizer(key: HandshakeKey, tokenizer: T) -> Self {
        Self {
            tokenizer,
            key,
            state: HandshakeState::default(),
        }
    }

    pub fn key(&self) -> &HandshakeKey {
        &self.key
    }

    /// The upgrade request for this attempt, carrying its key.
    pub fn build_request(&self, config: &HandshakeConfig) -> BytesMut {
        build_request(
            &self.key,
            &config.host,
            config.port,
            &config.path,
            &config.query,
            &config.extra_headers,
        )
    }

    pub fn header_end_reached(&self) -> bool {
        self.state.header_end_reached
    }

    pub fn error(&self) -> Option<&HandshakeError> {
        self.state.error.as_ref()
    }

    /// Accumulated value of a recognized response header.
    pub fn header_value(&self, field: RecognizedHeaderField) -> &[u8] {
        self.state.fields.value(field)
    }

    /// Feed the next chunk of response bytes.
    ///
    /// # Panics
    ///
    /// If called after a previous call reported the end of the header section.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Progress {
        assert!(
            !self.state.header_end_reached,
            "process_bytes called after the response head ended"
        );

        let Self {
            tokenizer,
            key,
            state,
        } = self;

        let had_error = state.error.is_some();
        let consumed = if had_error {
            0
        } else {
            let result = tokenizer.execute(bytes, &mut |event| state.on_event(event));
            match result {
                Ok(consumed) => consumed,
                Err(err) => {
                    state.fail(HandshakeError::Malformed(err));
                    bytes.len()
                }
            }
        };

        if state.header_end_reached {
            if let Some(err) = validate::validate(state, key) {
                state.fail(err);
            }
        }
        if let (false, Some(err)) = (had_error, &state.error) {
            tracing::warn!(error = %err, "opening handshake failed");
        }

        Progress {
            consumed,
            header_end_reached: state.header_end_reached,
            error: state.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handshake::key::tests::rfc_sample;
    use crate::tokenizer::TokenizerError;

    const ACCEPT: &str = "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=";

    fn parser() -> OpeningHandshakeParser {
        OpeningHandshakeParser::new(HandshakeKey::generate(&rfc_sample()))
    }

    fn response(status: &str, accept: &str, extra: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 {status}\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Accept: {accept}\r\n\
             {extra}\r\n"
        )
        .into_bytes()
    }

    fn feed_all(parser: &mut OpeningHandshakeParser, chunks: &[&[u8]]) -> Progress {
        let mut last = None;
        for chunk in chunks {
            let progress = parser.process_bytes(chunk);
            let done = progress.header_end_reached;
            last = Some(progress);
            if done {
                break;
            }
        }
        last.unwrap()
    }

    #[test]
    fn accepts_in_one_chunk() {
        let mut p = parser();
        let bytes = response("101 Switching Protocols", ACCEPT, "");
        let progress = p.process_bytes(&bytes);
        assert_eq!(progress.consumed, bytes.len());
        assert!(progress.is_accepted());
        assert_eq!(progress.code(), ErrorCode::None);
        assert_eq!(p.header_value(RecognizedHeaderField::Accept), ACCEPT.as_bytes());
    }

    #[test]
    fn outcome_does_not_depend_on_split_point() {
        let bytes = response("101 Switching Protocols", ACCEPT, "");
        for split in 1..bytes.len() {
            let mut p = parser();
            let first = p.process_bytes(&bytes[..split]);
            assert!(!first.header_end_reached, "split at {split}");
            assert_eq!(first.consumed, split);
            let second = p.process_bytes(&bytes[split..]);
            assert!(second.is_accepted(), "split at {split}");
        }
    }

    #[test]
    fn byte_at_a_time() {
        let bytes = response("101 Switching Protocols", ACCEPT, "");
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        let mut p = parser();
        assert!(feed_all(&mut p, &chunks).is_accepted());
    }

    #[test]
    fn reports_bytes_after_the_head_as_unconsumed() {
        let head = response("101 Switching Protocols", ACCEPT, "");
        let mut bytes = head.clone();
        bytes.extend_from_slice(&[0x81, 0x00]);
        let progress = parser().process_bytes(&bytes);
        assert!(progress.is_accepted());
        assert_eq!(progress.consumed, head.len());
    }

    #[test]
    fn non_101_status_fails() {
        let progress = parser().process_bytes(&response("200 OK", ACCEPT, ""));
        assert!(progress.header_end_reached);
        assert_eq!(progress.error, Some(HandshakeError::Status(200)));
        assert_eq!(progress.code(), ErrorCode::HandshakeFailed);
    }

    #[test]
    fn status_failure_is_not_overwritten_by_validation() {
        let progress = parser().process_bytes(&response("403 Forbidden", "wrong", ""));
        assert_eq!(progress.error, Some(HandshakeError::Status(403)));
    }

    #[test]
    fn mismatched_accept_fails() {
        let off_by_one = "s3pPLMBiTxaQ9kYGzzhZRbK+xOo!";
        let progress = parser().process_bytes(&response("101 Switching Protocols", off_by_one, ""));
        assert_eq!(progress.error, Some(HandshakeError::Accept));
    }

    #[test]
    fn unsolicited_extension_fails() {
        let progress = parser().process_bytes(&response(
            "101 Switching Protocols",
            ACCEPT,
            "Sec-WebSocket-Extensions: permessage-deflate\r\n",
        ));
        assert_eq!(progress.error, Some(HandshakeError::Extensions));
    }

    #[test]
    fn mixed_case_upgrade_passes() {
        let bytes = b"HTTP/1.1 101 Switching Protocols\r\n\
                      upgrade: WebSocket\r\n\
                      CONNECTION: UPGRADE\r\n\
                      sec-websocket-accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n";
        assert!(parser().process_bytes(bytes).is_accepted());
    }

    #[test]
    fn malformed_head_latches_and_sticks() {
        let mut p = parser();
        let progress = p.process_bytes(b"HTTP/1.1 1O1 Switching\r\n\r\n");
        assert!(!progress.header_end_reached);
        assert!(matches!(progress.error, Some(HandshakeError::Malformed(TokenizerError::Http(_)))));

        let again = p.process_bytes(&response("101 Switching Protocols", ACCEPT, ""));
        assert_eq!(again.consumed, 0);
        assert_eq!(again.error, progress.error);
    }

    #[test]
    #[should_panic(expected = "after the response head ended")]
    fn feeding_after_header_end_panics() {
        let mut p = parser();
        p.process_bytes(&response("101 Switching Protocols", ACCEPT, ""));
        p.process_bytes(b"HTTP/1.1 101 Switching Protocols\r\n\r\n");
    }

    #[test]
    fn request_carries_the_parser_key() {
        let p = parser();
        let config = HandshakeConfig::new("example.com", 80).with_path("chat");
        let request = p.build_request(&config);
        let text = std::str::from_utf8(&request).unwrap();
        assert!(text.contains(&format!("Sec-WebSocket-Key:{}\r\n", p.key().encoded_key())));
    }

    /// Tokenizer that replays a fixed event script, splitting names and values.
    struct Scripted {
        delivered: bool,
        status: u16,
    }

    impl HeaderTokenizer for Scripted {
        fn execute(
            &mut self,
            input: &[u8],
            sink: &mut dyn FnMut(Event<'_>),
        ) -> Result<usize, TokenizerError> {
            if self.delivered {
                return Ok(0);
            }
            self.delivered = true;
            sink(Event::MessageBegin);
            sink(Event::HeaderField(b"Upg"));
            sink(Event::HeaderField(b"rade"));
            sink(Event::HeaderValue(b"web"));
            sink(Event::HeaderValue(b"socket"));
            sink(Event::HeaderField(b"Connection"));
            sink(Event::HeaderValue(b"upgrade"));
            sink(Event::HeaderField(b"Sec-WebSocket-"));
            sink(Event::HeaderField(b"Accept"));
            sink(Event::HeaderValue(ACCEPT.as_bytes()));
            sink(Event::HeadersComplete { status: self.status });
            sink(Event::HeaderField(b"Sec-WebSocket-Protocol"));
            sink(Event::HeaderValue(b"late"));
            sink(Event::MessageComplete);
            Ok(input.len())
        }
    }

    #[test]
    fn works_with_any_tokenizer() {
        let key = HandshakeKey::generate(&rfc_sample());
        let mut p = OpeningHandshakeParser::with_tokenizer(
            key,
            Scripted {
                delivered: false,
                status: 101,
            },
        );
        let progress = p.process_bytes(b"ignored");
        assert!(progress.is_accepted());
        assert_eq!(progress.consumed, 7);
        // Nothing is accumulated once the header section has ended.
        assert!(p.header_value(RecognizedHeaderField::Protocol).is_empty());
    }

    #[test]
    fn scripted_status_gate() {
        let key = HandshakeKey::generate(&rfc_sample());
        let mut p = OpeningHandshakeParser::with_tokenizer(
            key,
            Scripted {
                delivered: false,
                status: 426,
            },
        );
        assert_eq!(p.process_bytes(b"x").error, Some(HandshakeError::Status(426)));
    }

    #[test]
    fn config_limit_reaches_the_tokenizer() {
        let config = HandshakeConfig::new("example.com", 80).with_max_head_bytes(16);
        let mut p =
            OpeningHandshakeParser::from_config(HandshakeKey::generate(&rfc_sample()), &config);
        let progress = p.process_bytes(&response("101 Switching Protocols", ACCEPT, ""));
        assert_eq!(
            progress.error,
            Some(HandshakeError::Malformed(TokenizerError::TooLarge { limit: 16 }))
        );
    }
}
