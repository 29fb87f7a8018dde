// ABOUTME: Multiplexes terminal streams and control messages over one byte connection.
// ABOUTME: Each frame carries a destination tag and a length-prefixed payload.

mod error;
mod frame;
mod reader;
mod writer;

pub use error::{AttachError, ProtocolError};
pub use frame::{Frame, FrameHeader, HEADER_LEN, SocketDest, TerminalSize};
pub use reader::demux;
pub use writer::{AttachWriter, SharedAttachWriter, StreamWriter};
