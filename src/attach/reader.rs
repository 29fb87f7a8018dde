// ABOUTME: Demultiplexer for the remote-to-local half of an attach connection.
// ABOUTME: Routes each frame's payload to its sink until a quit frame or an error.

use super::error::{AttachError, ProtocolError};
use super::frame::{FrameHeader, SocketDest, TerminalSize, read_payload};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Read frames from `reader` and route them until a quit frame arrives.
///
/// Returns `Ok(())` after consuming the quit frame's payload; nothing after it
/// is read. A truncated header or payload ends the loop with a
/// [`ProtocolError`]. Resize frames are parsed and sent on `resize`.
pub async fn demux<R, O, E, I>(
    reader: &mut R,
    stdout: &mut O,
    stderr: &mut E,
    stdin: &mut I,
    resize: &mpsc::Sender<TerminalSize>,
) -> Result<(), AttachError>
where
    R: AsyncRead + Unpin + ?Sized,
    O: AsyncWrite + Unpin + ?Sized,
    E: AsyncWrite + Unpin + ?Sized,
    I: AsyncWrite + Unpin + ?Sized,
{
    loop {
        let header = FrameHeader::read_from(reader).await?;
        tracing::trace!(dest = %header.dest, len = header.len, "attach frame");

        match header.dest {
            SocketDest::Stdout => copy_payload(reader, stdout, header.len).await?,
            SocketDest::Stderr => copy_payload(reader, stderr, header.len).await?,
            SocketDest::Stdin => copy_payload(reader, stdin, header.len).await?,
            SocketDest::Resize => {
                let payload = read_payload(reader, header.len).await?;
                let size: TerminalSize =
                    serde_json::from_slice(&payload).map_err(AttachError::InvalidResize)?;
                resize
                    .send(size)
                    .await
                    .map_err(|_| AttachError::ResizeChannelClosed)?;
            }
            SocketDest::Quit => {
                read_payload(reader, header.len).await?;
                tracing::debug!("attach stream received quit");
                return Ok(());
            }
        }
    }
}

/// Copy exactly `len` bytes from `reader` to `sink` and flush it.
async fn copy_payload<R, W>(reader: &mut R, sink: &mut W, len: u32) -> Result<(), AttachError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut payload = (&mut *reader).take(u64::from(len));
    let copied = tokio::io::copy(&mut payload, sink).await?;
    sink.flush().await?;
    if copied < u64::from(len) {
        return Err(ProtocolError::ShortPayload {
            expected: len,
            read: copied,
        }
        .into());
    }
    Ok(())
}
