//! Handshake configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// Default cap on the size of the server's response head.
pub const DEFAULT_MAX_HEAD_BYTES: usize = 16 * 1024;

/// Default number of bytes requested from the transport per read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// An additional request header line, written verbatim as `name:value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHeader {
    pub name: String,
    pub value: String,
}

impl ExtraHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Where to connect and what to send in the upgrade request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    pub host: String,
    pub port: u16,
    /// Request path without the leading slash.
    pub path: String,
    /// Query string without the leading `?`; empty for none.
    pub query: String,
    pub extra_headers: Vec<ExtraHeader>,
    pub max_head_bytes: usize,
    pub read_chunk_size: usize,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 80,
            path: String::new(),
            query: String::new(),
            extra_headers: Vec::new(),
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

impl HandshakeConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the request path. A leading slash is dropped since the request line adds one.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = path.strip_prefix('/').unwrap_or(&path).to_string();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push(ExtraHeader::new(name, value));
        self
    }

    pub fn with_max_head_bytes(mut self, limit: usize) -> Self {
        self.max_head_bytes = limit;
        self
    }

    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    /// Reject configs that cannot produce a usable handshake.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::Config("host must not be empty".into()));
        }
        if self.max_head_bytes == 0 {
            return Err(Error::Config("max_head_bytes must be positive".into()));
        }
        if self.read_chunk_size == 0 {
            return Err(Error::Config("read_chunk_size must be positive".into()));
        }
        Ok(())
    }
}
