//! Protocol core of an RTMP publisher.
//!
//! Decodes the chunked message framing of an established RTMP connection into typed packets
//! and encodes outbound messages into chunks.  The handshake is expected to have completed
//! before any bytes are handed to a `Session`.
//!
//! ```
//! use pushcast_rtmp::messages::RtmpMessage;
//! use pushcast_rtmp::session::{Session, SessionConfig};
//! use pushcast_rtmp::time::RtmpTimestamp;
//! use std::io::Cursor;
//!
//! let mut sender = Session::new(SessionConfig::new()).unwrap();
//! let outbound = sender
//!     .encode_message(RtmpMessage::WindowAcknowledgement { size: 5000 }, RtmpTimestamp::new(0), 0)
//!     .unwrap();
//!
//! let mut receiver = Session::new(SessionConfig::new()).unwrap();
//! let packet = receiver.next_packet(&mut Cursor::new(outbound.bytes)).unwrap();
//!
//! assert_eq!(packet.message, RtmpMessage::WindowAcknowledgement { size: 5000 });
//! assert_eq!(receiver.state().window_ack_size(), 5000);
//! ```

pub mod chunk_io;
pub mod messages;
pub mod session;
pub mod time;

pub use crate::chunk_io::{DecodeError, EncodeError};
pub use crate::messages::{Packet, RtmpMessage};
pub use crate::session::{Session, SessionConfig};
