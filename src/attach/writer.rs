// ABOUTME: Frame writers for the local-to-remote half of an attach connection.
// ABOUTME: AttachWriter owns the sink; SharedAttachWriter serializes many producers onto it.

use super::error::AttachError;
use super::frame::{SocketDest, TerminalSize, encode_frame};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

const PUMP_BUFFER_SIZE: usize = 32 * 1024;

/// Writes one frame per call and flushes it before returning.
#[derive(Debug)]
pub struct AttachWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> AttachWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write `payload` as a single frame for `dest`.
    ///
    /// Returns the payload length; header bytes are not counted.
    pub async fn write(&mut self, dest: SocketDest, payload: &[u8]) -> Result<usize, AttachError> {
        let frame = encode_frame(dest, payload)?;
        self.inner.write_all(&frame).await?;
        self.inner.flush().await?;
        Ok(payload.len())
    }

    /// Send the new terminal size.
    pub async fn write_resize(&mut self, size: TerminalSize) -> Result<(), AttachError> {
        let payload = serde_json::to_vec(&size).map_err(AttachError::ResizeEncoding)?;
        self.write(SocketDest::Resize, &payload).await?;
        Ok(())
    }

    /// Tell the remote end to stop reading.
    pub async fn write_quit(&mut self) -> Result<(), AttachError> {
        self.write(SocketDest::Quit, &[]).await?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// An [`AttachWriter`] shared between tasks.
///
/// Each frame is written while holding the lock, so frames from different
/// producers never interleave on the wire.
#[derive(Debug)]
pub struct SharedAttachWriter<W> {
    inner: Arc<Mutex<AttachWriter<W>>>,
}

impl<W> Clone for SharedAttachWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: AsyncWrite + Unpin> SharedAttachWriter<W> {
    pub fn new(writer: AttachWriter<W>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// A writer bound to one destination.
    pub fn stream(&self, dest: SocketDest) -> StreamWriter<W> {
        StreamWriter {
            dest,
            inner: Arc::clone(&self.inner),
        }
    }

    pub async fn write(&self, dest: SocketDest, payload: &[u8]) -> Result<usize, AttachError> {
        self.inner.lock().await.write(dest, payload).await
    }

    pub async fn write_resize(&self, size: TerminalSize) -> Result<(), AttachError> {
        self.inner.lock().await.write_resize(size).await
    }

    pub async fn write_quit(&self) -> Result<(), AttachError> {
        self.inner.lock().await.write_quit().await
    }
}

/// Writes every payload as a frame for a fixed destination.
#[derive(Debug)]
pub struct StreamWriter<W> {
    dest: SocketDest,
    inner: Arc<Mutex<AttachWriter<W>>>,
}

impl<W: AsyncWrite + Unpin> StreamWriter<W> {
    pub fn dest(&self) -> SocketDest {
        self.dest
    }

    pub async fn write(&self, payload: &[u8]) -> Result<usize, AttachError> {
        self.inner.lock().await.write(self.dest, payload).await
    }

    /// Copy `source` into frames until EOF. Returns the payload bytes sent.
    pub async fn pump<R>(&self, mut source: R) -> Result<u64, AttachError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; PUMP_BUFFER_SIZE];
        let mut total = 0u64;
        loop {
            let n = source.read(&mut buf).await?;
            if n == 0 {
                tracing::trace!(dest = %self.dest, total, "attach source reached EOF");
                return Ok(total);
            }
            self.write(&buf[..n]).await?;
            total += n as u64;
        }
    }
}
