// ABOUTME: Wire format of the attach stream: an 8-byte header followed by the payload.
// ABOUTME: Byte 0 is the destination tag, bytes 4-7 the big-endian payload length.

use super::error::{AttachError, ProtocolError};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of every frame header in bytes.
pub const HEADER_LEN: usize = 8;

/// Where a frame's payload is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SocketDest {
    Stdout = 0,
    Stdin = 1,
    Stderr = 2,
    /// Payload is a JSON [`TerminalSize`].
    Resize = 3,
    /// Ends the stream; the payload is discarded.
    Quit = 4,
}

impl SocketDest {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SocketDest::Stdout),
            1 => Some(SocketDest::Stdin),
            2 => Some(SocketDest::Stderr),
            3 => Some(SocketDest::Resize),
            4 => Some(SocketDest::Quit),
            _ => None,
        }
    }
}

impl fmt::Display for SocketDest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocketDest::Stdout => "stdout",
            SocketDest::Stdin => "stdin",
            SocketDest::Stderr => "stderr",
            SocketDest::Resize => "resize",
            SocketDest::Quit => "quit",
        };
        f.write_str(name)
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub dest: SocketDest,
    pub len: u32,
}

impl FrameHeader {
    /// Header for a payload of `len` bytes.
    pub fn for_payload(dest: SocketDest, len: usize) -> Result<Self, AttachError> {
        let len = u32::try_from(len).map_err(|_| AttachError::FrameTooLarge(len))?;
        Ok(Self { dest, len })
    }

    /// Reserved bytes 1-3 are written as zero.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = self.dest.tag();
        buf[4..].copy_from_slice(&self.len.to_be_bytes());
        buf
    }

    /// Reserved bytes are ignored.
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Result<Self, ProtocolError> {
        let dest =
            SocketDest::from_tag(buf[0]).ok_or(ProtocolError::UnknownDestination(buf[0]))?;
        let len = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
        Ok(Self { dest, len })
    }

    /// Read exactly one header. EOF before the eighth byte is a protocol error.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, AttachError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut buf = [0u8; HEADER_LEN];
        let mut read = 0;
        while read < HEADER_LEN {
            let n = reader.read(&mut buf[read..]).await?;
            if n == 0 {
                return Err(ProtocolError::ShortHeader { read }.into());
            }
            read += n;
        }
        Ok(Self::decode(&buf)?)
    }
}

/// One complete frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub dest: SocketDest,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(dest: SocketDest, payload: impl Into<Bytes>) -> Self {
        Self {
            dest,
            payload: payload.into(),
        }
    }

    /// Header and payload as one contiguous buffer.
    pub fn encode(&self) -> Result<Bytes, AttachError> {
        encode_frame(self.dest, &self.payload)
    }

    /// Read one whole frame.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, AttachError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let header = FrameHeader::read_from(reader).await?;
        let payload = read_payload(reader, header.len).await?;
        Ok(Self {
            dest: header.dest,
            payload: payload.into(),
        })
    }
}

/// Terminal dimensions carried by a resize frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

pub(crate) fn encode_frame(dest: SocketDest, payload: &[u8]) -> Result<Bytes, AttachError> {
    let header = FrameHeader::for_payload(dest, payload.len())?;
    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_slice(&header.encode());
    buf.put_slice(payload);
    Ok(buf.freeze())
}

/// Read exactly `len` payload bytes.
pub(crate) async fn read_payload<R>(reader: &mut R, len: u32) -> Result<Vec<u8>, AttachError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut payload = Vec::new();
    let read = (&mut *reader)
        .take(u64::from(len))
        .read_to_end(&mut payload)
        .await?;
    if read < len as usize {
        return Err(ProtocolError::ShortPayload {
            expected: len,
            read: read as u64,
        }
        .into());
    }
    Ok(payload)
}
