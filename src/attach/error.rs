// ABOUTME: Error types for the attach stream multiplexer.
// ABOUTME: Protocol violations are kept apart from I/O and control-channel failures.

use thiserror::Error;

/// The byte stream broke the framing rules. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("short frame header: got {read} of 8 bytes")]
    ShortHeader { read: usize },

    #[error("short frame payload: expected {expected} bytes, got {read}")]
    ShortPayload { expected: u32, read: u64 },

    #[error("unknown destination tag {0}")]
    UnknownDestination(u8),
}

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("attach protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("attach I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload of {0} bytes does not fit in one frame")]
    FrameTooLarge(usize),

    #[error("invalid resize payload: {0}")]
    InvalidResize(#[source] serde_json::Error),

    #[error("unable to encode resize payload: {0}")]
    ResizeEncoding(#[source] serde_json::Error),

    #[error("resize channel closed")]
    ResizeChannelClosed,
}

impl AttachError {
    /// The protocol violation behind this error, if any.
    pub fn protocol(&self) -> Option<&ProtocolError> {
        match self {
            AttachError::Protocol(e) => Some(e),
            _ => None,
        }
    }
}
