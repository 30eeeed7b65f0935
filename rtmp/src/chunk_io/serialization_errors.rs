use pushcast_amf0::Amf0EncodeError;
use std::io;
use thiserror::Error;

/// An enumeration defining all the errors that can occur while turning outbound RTMP messages
/// into chunks.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A message can't be longer than 16777215 bytes, even when split across multiple chunks
    #[error("The message has a length of {size} bytes, which is over the allowed size of 16777215 bytes")]
    MessageTooLong { size: usize },

    /// Chunk sizes must be between 1 and 2147483647
    #[error("An invalid chunk size of {size} was specified.  Chunk size must be between 1 and 2147483647")]
    InvalidChunkSize { size: u32 },

    /// Chunk stream ids 0 and 1 are reserved by the basic header encoding
    #[error("Chunk stream id {csid} can't be encoded.  Only ids between 2 and 65599 are allowed")]
    InvalidChunkStreamId { csid: u32 },

    /// The values could not be encoded as AMF0
    #[error("The values could not be encoded as AMF0: {0}")]
    Amf0(#[from] Amf0EncodeError),

    #[error("{0}")]
    Io(#[from] io::Error),
}
