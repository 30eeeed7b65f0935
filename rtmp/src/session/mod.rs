//! The per connection entry point for decoding inbound packets and encoding outbound ones.
//!
//! A `Session` is created once the handshake has completed.  All bytes the peer sends must
//! pass through the same session, in order, since chunk headers are compressed against the
//! chunks that came before them.

mod config;

pub use self::config::SessionConfig;

use crate::chunk_io::{
    ChunkDeserializer, ChunkSerializer, DecodeError, EncodeError, SerializedMessage,
    SessionState,
};
use crate::messages::{Packet, RtmpMessage};
use crate::time::RtmpTimestamp;
use std::io::Read;
use tracing::trace;

pub struct Session {
    state: SessionState,
    deserializer: ChunkDeserializer,
    serializer: ChunkSerializer,
}

impl Session {
    /// Creates a session with the given starting values.  Fails if either chunk size is
    /// zero or larger than 2147483647.
    pub fn new(config: SessionConfig) -> Result<Session, EncodeError> {
        Ok(Session {
            state: SessionState::new(&config)?,
            deserializer: ChunkDeserializer::new(),
            serializer: ChunkSerializer::new(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Reads chunks until the next packet is complete and decoded.
    ///
    /// Side effects of protocol control messages (chunk size, acknowledgement window, peer
    /// bandwidth, aborts) are applied to the session state before the packet is returned, so
    /// they govern the very next chunk read.  A source that is exhausted before the packet
    /// completes fails with `DecodeError::Truncated`.
    pub fn next_packet<R: Read>(&mut self, reader: &mut R) -> Result<Packet, DecodeError> {
        match self.read_packet(reader)? {
            Some(packet) => Ok(packet),
            None => Err(DecodeError::Truncated),
        }
    }

    /// Like `next_packet`, but returns `Ok(None)` when the source is exhausted exactly on a
    /// chunk boundary before any byte of a new packet was read.
    pub fn read_packet<R: Read>(&mut self, reader: &mut R) -> Result<Option<Packet>, DecodeError> {
        let message = match self.deserializer.read_message(reader, &mut self.state)? {
            Some(message) => message,
            None => return Ok(None),
        };

        let packet = Packet::decode(message)?;
        self.state.apply_control_message(&packet.message)?;

        trace!(
            csid = packet.header.chunk_stream_id,
            type_id = packet.header.message_type_id,
            timestamp = packet.header.timestamp.value,
            "Decoded packet"
        );

        Ok(Some(packet))
    }

    /// Iterates over the packets in the source, ending when the source is exhausted on a
    /// chunk boundary or after the first fatal error.
    pub fn packets<'a, R: Read>(&'a mut self, reader: &'a mut R) -> Packets<'a, R> {
        Packets {
            session: self,
            reader,
            finished: false,
        }
    }

    /// Splits the message into chunks using the current send chunk size
    pub fn encode_message(
        &mut self,
        message: RtmpMessage,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
    ) -> Result<SerializedMessage, EncodeError> {
        self.encode(message, timestamp, message_stream_id, false)
    }

    /// Encodes an audio or video message that the transport may skip when it falls behind.
    /// Sequence headers and key frames should go through `encode_message` instead.
    pub fn encode_droppable_message(
        &mut self,
        message: RtmpMessage,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
    ) -> Result<SerializedMessage, EncodeError> {
        self.encode(message, timestamp, message_stream_id, true)
    }

    /// Changes the chunk size used for outbound messages.
    ///
    /// The returned SetChunkSize message is chunked with the old size and must be sent before
    /// anything encoded after this call.
    pub fn request_chunk_size(
        &mut self,
        size: u32,
        timestamp: RtmpTimestamp,
    ) -> Result<SerializedMessage, EncodeError> {
        let payload = RtmpMessage::SetChunkSize { size }.into_message_payload(timestamp, 0)?;
        let serialized =
            self.serializer
                .serialize(&payload, self.state.send_chunk_size(), false, false)?;

        self.state.set_send_chunk_size(size)?;
        Ok(serialized)
    }

    /// Returns the Acknowledgement message to send once a full acknowledgement window of
    /// bytes has been received since the last one.
    pub fn pending_acknowledgement(&mut self) -> Option<RtmpMessage> {
        self.state.take_acknowledgement()
    }

    fn encode(
        &mut self,
        message: RtmpMessage,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
        can_be_dropped: bool,
    ) -> Result<SerializedMessage, EncodeError> {
        let payload = message.into_message_payload(timestamp, message_stream_id)?;
        self.serializer.serialize(
            &payload,
            self.state.send_chunk_size(),
            false,
            can_be_dropped,
        )
    }
}

/// Iterator over the packets of a byte source, created by `Session::packets`
pub struct Packets<'a, R> {
    session: &'a mut Session,
    reader: &'a mut R,
    finished: bool,
}

impl<'a, R: Read> Iterator for Packets<'a, R> {
    type Item = Result<Packet, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.session.read_packet(self.reader) {
            Ok(Some(packet)) => Some(Ok(packet)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = error.is_fatal();
                Some(Err(error))
            }
        }
    }
}
