//! Default tokenizer: buffers the response head and parses it with httparse.

use bytes::BytesMut;
use httparse::Status;

use super::{Event, HeaderTokenizer, TokenizerError};
use crate::config::DEFAULT_MAX_HEAD_BYTES;

// Limit the number of header lines.
const MAX_HEADERS: usize = 64;

#[derive(Debug)]
enum State {
    Head,
    Done,
    Failed(TokenizerError),
}

/// Accumulates bytes until httparse sees a complete response head, then emits
/// every event for it in one go.
///
/// Every byte is consumed while the head is incomplete. The call that
/// completes the head consumes only up to the blank line, so anything after it
/// stays with the caller.
#[derive(Debug)]
pub struct BufferedTokenizer {
    head: BytesMut,
    limit: usize,
    state: State,
}

impl Default for BufferedTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEAD_BYTES)
    }
}

impl BufferedTokenizer {
    /// Tokenizer that fails once the head grows past `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            head: BytesMut::new(),
            limit,
            state: State::Head,
        }
    }
}

impl HeaderTokenizer for BufferedTokenizer {
    fn execute(
        &mut self,
        input: &[u8],
        sink: &mut dyn FnMut(Event<'_>),
    ) -> Result<usize, TokenizerError> {
        match &self.state {
            State::Head => {}
            State::Done => return Ok(0),
            State::Failed(err) => return Err(err.clone()),
        }
        if input.is_empty() {
            return Ok(0);
        }
        if self.head.is_empty() {
            sink(Event::MessageBegin);
        }

        let buffered = self.head.len();
        self.head.extend_from_slice(input);

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut response = httparse::Response::new(&mut headers);
        let result = match response.parse(&self.head) {
            Ok(Status::Partial) if self.head.len() >= self.limit => {
                Err(TokenizerError::TooLarge { limit: self.limit })
            }
            Ok(Status::Partial) => Ok(input.len()),
            Ok(Status::Complete(head_len)) if head_len > self.limit => {
                Err(TokenizerError::TooLarge { limit: self.limit })
            }
            Ok(Status::Complete(head_len)) => {
                let status = response.code.unwrap_or_default();
                for header in response.headers.iter() {
                    sink(Event::HeaderField(header.name.as_bytes()));
                    sink(Event::HeaderValue(header.value));
                }
                sink(Event::HeadersComplete { status });
                if !has_body(status) {
                    sink(Event::MessageComplete);
                }
                self.state = State::Done;
                Ok(head_len.saturating_sub(buffered))
            }
            Err(err) => Err(err.into()),
        };

        if let Err(err) = &result {
            self.state = State::Failed(err.clone());
        }
        result
    }
}

// Responses that never carry a body end with their head.
fn has_body(status: u16) -> bool {
    !((100..200).contains(&status) || status == 204 || status == 304)
}
