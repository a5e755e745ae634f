//! HTTP response-head tokenizer seam.
//!
//! The handshake parser does not parse HTTP itself. It feeds bytes to a
//! [`HeaderTokenizer`], which reports what it found as a sequence of
//! [`Event`]s delivered synchronously while the bytes are consumed.

mod buffered;

pub use buffered::BufferedTokenizer;

use thiserror::Error;

/// Something the tokenizer recognised in the response head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event<'a> {
    MessageBegin,
    /// Header name bytes. A name may arrive split over consecutive events.
    HeaderField(&'a [u8]),
    /// Header value bytes for the most recent name.
    HeaderValue(&'a [u8]),
    HeadersComplete {
        status: u16,
    },
    MessageComplete,
}

/// The response could not be tokenized as HTTP.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("invalid response head: {0}")]
    Http(#[from] httparse::Error),

    #[error("response head exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("{0}")]
    Other(String),
}

/// Streaming HTTP response tokenizer.
pub trait HeaderTokenizer {
    /// Consume a prefix of `input`, reporting events to `sink` as they are found.
    ///
    /// Returns how many bytes were consumed. Bytes not consumed must be fed
    /// again, followed by the next chunk, on a later call.
    fn execute(
        &mut self,
        input: &[u8],
        sink: &mut dyn FnMut(Event<'_>),
    ) -> Result<usize, TokenizerError>;
}

impl<T: HeaderTokenizer + ?Sized> HeaderTokenizer for Box<T> {
    fn execute(
        &mut self,
        input: &[u8],
        sink: &mut dyn FnMut(Event<'_>),
    ) -> Result<usize, TokenizerError> {
        (**self).execute(input, sink)
    }
}
