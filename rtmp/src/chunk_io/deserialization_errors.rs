use pushcast_amf0::Amf0DecodeError;
use std::io;
use thiserror::Error;

/// An enumeration defining all the errors that can occur while turning inbound bytes into
/// RTMP packets.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte source ended in the middle of a chunk, or a message body was shorter than its
    /// type requires.
    #[error("Hit end of the input but was expecting more data")]
    Truncated,

    /// An AMF0 value in a command or data message started with an unknown type marker
    #[error("Encountered unknown AMF0 type marker {marker:#04x}")]
    UnknownType { marker: u8 },

    /// A message was fully reassembled but its type id is not one we can interpret.  The
    /// message body has already been consumed, so decoding may continue with the next chunk.
    #[error("Received message with unsupported type id {type_id} ({message_length} bytes)")]
    UnsupportedMessageType { type_id: u8, message_length: u32 },

    /// The chunk stream broke one of the framing rules, such as a compressed chunk header on a
    /// chunk stream that never received a full one.
    #[error("Protocol violation on chunk stream {csid}: {reason}")]
    ProtocolViolation { csid: u32, reason: &'static str },

    /// The message body did not have the layout its type requires
    #[error("Message with type id {type_id} was not encoded in an expected format: {reason}")]
    InvalidMessageFormat { type_id: u8, reason: &'static str },

    /// The peer requested a chunk size of zero or one with the reserved high bit set
    #[error("Peer requested an invalid chunk size of {size}")]
    InvalidChunkSize { size: u32 },

    /// An AMF0 failure other than truncation or an unknown marker (e.g. invalid utf-8)
    #[error("Message contained invalid AMF0 data: {0}")]
    Amf0(#[source] Amf0DecodeError),

    /// An I/O error occurred while reading from the byte source
    #[error("{0}")]
    Io(#[source] io::Error),
}

impl DecodeError {
    /// Returns true when the error leaves the byte stream at an unknown position, meaning the
    /// connection can't be decoded any further.
    pub fn is_fatal(&self) -> bool {
        match self {
            DecodeError::Truncated
            | DecodeError::ProtocolViolation { .. }
            | DecodeError::InvalidChunkSize { .. }
            | DecodeError::Io(_) => true,

            DecodeError::UnknownType { .. }
            | DecodeError::UnsupportedMessageType { .. }
            | DecodeError::InvalidMessageFormat { .. }
            | DecodeError::Amf0(_) => false,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => DecodeError::Truncated,
            _ => DecodeError::Io(error),
        }
    }
}

impl From<Amf0DecodeError> for DecodeError {
    fn from(error: Amf0DecodeError) -> Self {
        match error {
            Amf0DecodeError::Truncated => DecodeError::Truncated,
            Amf0DecodeError::UnknownType { marker } => DecodeError::UnknownType { marker },
            Amf0DecodeError::Io(error) => DecodeError::Io(error),
            other => DecodeError::Amf0(other),
        }
    }
}
