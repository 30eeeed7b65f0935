use super::types;
use crate::chunk_io::EncodeError;
use crate::messages::RtmpMessage;
use crate::time::RtmpTimestamp;
use bytes::Bytes;

/// Represents a raw outbound RTMP message, ready to be split into chunks
#[derive(PartialEq, Debug, Clone)]
pub struct MessagePayload {
    pub timestamp: RtmpTimestamp,
    pub type_id: u8,
    pub message_stream_id: u32,
    pub data: Bytes,
}

impl MessagePayload {
    pub fn from_rtmp_message(
        message: RtmpMessage,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
    ) -> Result<MessagePayload, EncodeError> {
        let type_id = message.get_message_type_id();

        let data = match message {
            RtmpMessage::SetChunkSize { size } => types::set_chunk_size::serialize(size)?,
            RtmpMessage::Abort { stream_id } => types::abort::serialize(stream_id)?,
            RtmpMessage::Acknowledgement { sequence_number } => {
                types::acknowledgement::serialize(sequence_number)?
            }

            RtmpMessage::UserControl { event } => types::user_control::serialize(event)?,
            RtmpMessage::WindowAcknowledgement { size } => {
                types::window_acknowledgement_size::serialize(size)?
            }

            RtmpMessage::SetPeerBandwidth { size, limit_type } => {
                types::set_peer_bandwidth::serialize(limit_type, size)?
            }

            RtmpMessage::AudioData { data } => data,
            RtmpMessage::VideoData { data } => data,
            RtmpMessage::Amf0Command {
                command_name,
                transaction_id,
                values,
            } => types::amf0_command::serialize(command_name, transaction_id, values)?,

            RtmpMessage::Amf0Data { values } => types::amf0_data::serialize(&values)?,
        };

        Ok(MessagePayload {
            timestamp,
            type_id,
            message_stream_id,
            data,
        })
    }
}
