/*!
This module contains all the RTMP message types as well as functionality for turning completed
chunk stream messages into typed packets, and typed messages back into payloads for the chunk
serializer.

`MessagePayload`s carry the auxiliary data of an outbound RTMP message, such as what message
stream it is meant for, the timestamp for the message and what type of message it is.
*/

pub mod commands;
mod message_payload;
mod packet;
mod types;

pub use self::message_payload::MessagePayload;
pub use self::packet::Packet;
use crate::chunk_io::EncodeError;
use crate::time::RtmpTimestamp;
use bytes::Bytes;
use pushcast_amf0::Amf0Value;

/// The message type ids this crate can interpret
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MessageType {
    SetChunkSize,
    Abort,
    Acknowledgement,
    UserControl,
    WindowAcknowledgement,
    SetPeerBandwidth,
    AudioData,
    VideoData,
    Amf0Data,
    Amf0Command,
}

impl MessageType {
    pub fn from_id(type_id: u8) -> Option<MessageType> {
        match type_id {
            1 => Some(MessageType::SetChunkSize),
            2 => Some(MessageType::Abort),
            3 => Some(MessageType::Acknowledgement),
            4 => Some(MessageType::UserControl),
            5 => Some(MessageType::WindowAcknowledgement),
            6 => Some(MessageType::SetPeerBandwidth),
            8 => Some(MessageType::AudioData),
            9 => Some(MessageType::VideoData),
            18 => Some(MessageType::Amf0Data),
            20 => Some(MessageType::Amf0Command),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            MessageType::SetChunkSize => 1,
            MessageType::Abort => 2,
            MessageType::Acknowledgement => 3,
            MessageType::UserControl => 4,
            MessageType::WindowAcknowledgement => 5,
            MessageType::SetPeerBandwidth => 6,
            MessageType::AudioData => 8,
            MessageType::VideoData => 9,
            MessageType::Amf0Data => 18,
            MessageType::Amf0Command => 20,
        }
    }
}

/// The type of bandwidth limiting that is being requested
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PeerBandwidthLimitType {
    /// Peer should limit its output bandwidth to the indicated window size
    Hard,

    /// The peer should limit its output bandwidth to the window indicated or the limit
    /// already in effect, whichever is smaller.
    Soft,

    /// If we previously had a hard limit, this limit should be treated as hard.  Otherwise ignore.
    Dynamic,
}

/// Events and notifications carried by user control messages
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UserControlEvent {
    /// A stream has become functional
    StreamBegin { stream_id: u32 },

    /// Playback of data on the stream is over
    StreamEof { stream_id: u32 },

    /// There is no more data on the stream
    StreamDry { stream_id: u32 },

    /// The buffer size (in milliseconds) the client is using for the stream
    SetBufferLength { stream_id: u32, buffer_length: u32 },

    /// The stream is a recorded stream
    StreamIsRecorded { stream_id: u32 },

    /// Tests whether the peer is reachable
    PingRequest { timestamp: RtmpTimestamp },

    /// Reply to a ping request, echoing its timestamp
    PingResponse { timestamp: RtmpTimestamp },

    /// Buffer Empty (unofficial name): the server sent a complete buffer and waits for its
    /// play duration to pass before sending the next one.
    BufferEmpty { stream_id: u32 },

    /// Buffer Ready (unofficial name): a new buffer starts after a Buffer Empty event
    BufferReady { stream_id: u32 },
}

/// An enumeration of all types of RTMP messages that are supported
#[derive(PartialEq, Debug, Clone)]
pub enum RtmpMessage {
    /// Tells the peer that the maximum chunk size for RTMP chunks it will be sending is changing
    /// to the specified size.
    SetChunkSize { size: u32 },

    /// Notifies the peer that if it is waiting for chunks to complete a message on the given
    /// chunk stream that it should discard the chunks it has already received.
    Abort { stream_id: u32 },

    /// An acknowledgement of the total number of bytes received so far
    Acknowledgement { sequence_number: u32 },

    /// Notifies the peer of an event, such as a stream being
    /// created or telling the peer how much of a buffer it should have.
    UserControl { event: UserControlEvent },

    /// Notifies the peer how many bytes should be received before sending an `Acknowledgement`
    /// message
    WindowAcknowledgement { size: u32 },

    /// Indicates that the peer should limit its output bandwidth
    SetPeerBandwidth {
        size: u32,
        limit_type: PeerBandwidthLimitType,
    },

    /// A message containing audio data
    AudioData { data: Bytes },

    /// A message containing video data
    VideoData { data: Bytes },

    /// A command encoded with AMF0 values.  `values` holds everything after the command name
    /// and transaction id, usually starting with the command object.
    Amf0Command {
        command_name: String,
        transaction_id: f64,
        values: Vec<Amf0Value>,
    },

    /// A message containing an array of data encoded as AMF0 values
    Amf0Data { values: Vec<Amf0Value> },
}

impl RtmpMessage {
    pub fn into_message_payload(
        self,
        timestamp: RtmpTimestamp,
        message_stream_id: u32,
    ) -> Result<MessagePayload, EncodeError> {
        MessagePayload::from_rtmp_message(self, timestamp, message_stream_id)
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            RtmpMessage::SetChunkSize { .. } => MessageType::SetChunkSize,
            RtmpMessage::Abort { .. } => MessageType::Abort,
            RtmpMessage::Acknowledgement { .. } => MessageType::Acknowledgement,
            RtmpMessage::UserControl { .. } => MessageType::UserControl,
            RtmpMessage::WindowAcknowledgement { .. } => MessageType::WindowAcknowledgement,
            RtmpMessage::SetPeerBandwidth { .. } => MessageType::SetPeerBandwidth,
            RtmpMessage::AudioData { .. } => MessageType::AudioData,
            RtmpMessage::VideoData { .. } => MessageType::VideoData,
            RtmpMessage::Amf0Command { .. } => MessageType::Amf0Command,
            RtmpMessage::Amf0Data { .. } => MessageType::Amf0Data,
        }
    }

    pub fn get_message_type_id(&self) -> u8 {
        self.message_type().id()
    }
}
