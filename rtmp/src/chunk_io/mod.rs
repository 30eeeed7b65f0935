//! Framing of RTMP messages into chunks.
//!
//! Inbound bytes flow through `read_chunk_header` and the per chunk stream reassembly kept in
//! `SessionState` until a `CompleteMessage` is available.  Outbound messages are split into
//! chunks by the `ChunkSerializer`.

mod chunk_header;
mod chunk_stream;
mod deserialization_errors;
mod deserializer;
mod serialization_errors;
mod serializer;
mod session_state;

pub use self::chunk_header::{
    read_chunk_header, ChunkHeader, ChunkHeaderFormat, EXTENDED_TIMESTAMP_ESCAPE,
};
pub use self::chunk_stream::CompleteMessage;
pub use self::deserialization_errors::DecodeError;
pub use self::deserializer::ChunkDeserializer;
pub use self::serialization_errors::EncodeError;
pub use self::serializer::{ChunkSerializer, SerializedMessage};
pub use self::session_state::{SessionState, MAX_CHUNK_SIZE};
