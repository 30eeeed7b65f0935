use super::types;
use crate::chunk_io::{ChunkHeader, CompleteMessage, DecodeError};
use crate::messages::{MessageType, RtmpMessage};
use tracing::debug;

/// A fully decoded inbound message along with the header of its first chunk
#[derive(PartialEq, Debug, Clone)]
pub struct Packet {
    pub header: ChunkHeader,
    pub message: RtmpMessage,
}

impl Packet {
    /// Interprets the body of a reassembled message based on its type id.
    ///
    /// The whole message has already been read off the wire at this point, so every error
    /// returned here leaves the chunk stream aligned on the next chunk.
    pub fn decode(message: CompleteMessage) -> Result<Packet, DecodeError> {
        let CompleteMessage { header, data } = message;
        let type_id = header.message_type_id;

        let message_type = match MessageType::from_id(type_id) {
            Some(message_type) => message_type,
            None => {
                debug!(type_id, length = data.len(), "Unsupported message type received");
                return Err(DecodeError::UnsupportedMessageType {
                    type_id,
                    message_length: header.message_length,
                });
            }
        };

        let message = match message_type {
            MessageType::SetChunkSize => types::set_chunk_size::deserialize(data)?,
            MessageType::Abort => types::abort::deserialize(data)?,
            MessageType::Acknowledgement => types::acknowledgement::deserialize(data)?,
            MessageType::UserControl => types::user_control::deserialize(data)?,
            MessageType::WindowAcknowledgement => {
                types::window_acknowledgement_size::deserialize(data)?
            }
            MessageType::SetPeerBandwidth => types::set_peer_bandwidth::deserialize(data)?,
            MessageType::AudioData => RtmpMessage::AudioData { data },
            MessageType::VideoData => RtmpMessage::VideoData { data },
            MessageType::Amf0Data => types::amf0_data::deserialize(data)?,
            MessageType::Amf0Command => types::amf0_command::deserialize(data)?,
        };

        Ok(Packet { header, message })
    }
}
