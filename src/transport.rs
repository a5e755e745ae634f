//! Transport abstraction for the handshake driver.
//!
//! Any tokio byte stream (TCP, TLS, in-memory duplex) is a transport through
//! the blanket impl. Implement the trait directly to plug in something else.

use crate::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Byte-stream transport the handshake is driven over.
#[async_trait]
pub trait Transport: Send {
    /// Write all of `data` and flush it.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read into `buf`, returning the number of bytes read. Zero means EOF.
    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
}

#[async_trait]
impl<S> Transport for S
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data).await?;
        self.flush().await?;
        Ok(())
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.read(buf).await?)
    }
}
