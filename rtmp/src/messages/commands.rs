//! Builders for the commands a publishing client sends, and helpers for reading the
//! server's responses to them.
//!
//! A typical publish sequence is `connect`, `releaseStream`, `FCPublish`, `createStream`
//! and finally `publish` on the message stream id returned by `createStream`.  Stream
//! metadata is sent after publishing starts with `set_data_frame`.

use crate::messages::RtmpMessage;
use pushcast_amf0::{insert_property, Amf0Properties, Amf0Value};

pub const CONNECT: &str = "connect";
pub const RELEASE_STREAM: &str = "releaseStream";
pub const FC_PUBLISH: &str = "FCPublish";
pub const CREATE_STREAM: &str = "createStream";
pub const PUBLISH: &str = "publish";
pub const FC_UNPUBLISH: &str = "FCUnpublish";
pub const DELETE_STREAM: &str = "deleteStream";
pub const RESULT: &str = "_result";
pub const ERROR: &str = "_error";
pub const ON_STATUS: &str = "onStatus";

pub const SET_DATA_FRAME: &str = "@setDataFrame";
pub const ON_METADATA: &str = "onMetaData";

const DEFAULT_FLASH_VERSION: &str = "FMLE/3.0 (compatible; FMSc/1.0)";

/// The type of publish request being made
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PublishType {
    /// The published stream should be sent out without recording it in a file
    Live,

    /// The published stream should be recorded to a new file, replacing any existing one
    Record,

    /// The stream is published and the data should be appended to a file
    Append,
}

impl PublishType {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishType::Live => "live",
            PublishType::Record => "record",
            PublishType::Append => "append",
        }
    }
}

/// Properties of the `connect` command object
#[derive(PartialEq, Debug, Clone)]
pub struct ConnectRequest {
    pub app: String,
    pub tc_url: String,
    pub flash_version: String,
}

impl ConnectRequest {
    pub fn new(app: &str, tc_url: &str) -> ConnectRequest {
        ConnectRequest {
            app: app.to_string(),
            tc_url: tc_url.to_string(),
            flash_version: DEFAULT_FLASH_VERSION.to_string(),
        }
    }
}

/// Contains the metadata information a stream may advertise on publishing
#[derive(PartialEq, Debug, Clone, Default)]
pub struct StreamMetadata {
    pub video_width: Option<u32>,
    pub video_height: Option<u32>,
    pub video_codec_id: Option<u32>,
    pub video_frame_rate: Option<f32>,
    pub video_bitrate_kbps: Option<u32>,
    pub audio_codec_id: Option<u32>,
    pub audio_bitrate_kbps: Option<u32>,
    pub audio_sample_rate: Option<u32>,
    pub audio_sample_size: Option<u32>,
    pub audio_channels: Option<u32>,
    pub audio_is_stereo: Option<bool>,
    pub encoder: Option<String>,
}

impl StreamMetadata {
    pub fn new() -> StreamMetadata {
        StreamMetadata::default()
    }

    /// Only the fields that are set are written, in a fixed order
    pub fn to_properties(&self) -> Amf0Properties {
        let mut properties = Amf0Properties::new();
        let mut set_number = |name: &str, value: Option<f64>| {
            if let Some(value) = value {
                insert_property(&mut properties, name.to_string(), Amf0Value::Number(value));
            }
        };

        set_number("width", self.video_width.map(f64::from));
        set_number("height", self.video_height.map(f64::from));
        set_number("videocodecid", self.video_codec_id.map(f64::from));
        set_number("framerate", self.video_frame_rate.map(f64::from));
        set_number("videodatarate", self.video_bitrate_kbps.map(f64::from));
        set_number("audiocodecid", self.audio_codec_id.map(f64::from));
        set_number("audiodatarate", self.audio_bitrate_kbps.map(f64::from));
        set_number("audiosamplerate", self.audio_sample_rate.map(f64::from));
        set_number("audiosamplesize", self.audio_sample_size.map(f64::from));
        set_number("audiochannels", self.audio_channels.map(f64::from));

        if let Some(stereo) = self.audio_is_stereo {
            insert_property(&mut properties, "stereo".to_string(), Amf0Value::Boolean(stereo));
        }

        if let Some(encoder) = &self.encoder {
            insert_property(
                &mut properties,
                "encoder".to_string(),
                Amf0Value::Utf8String(encoder.clone()),
            );
        }

        properties
    }
}

pub fn connect(transaction_id: f64, request: &ConnectRequest) -> RtmpMessage {
    let command_object = Amf0Value::object(vec![
        ("app", Amf0Value::Utf8String(request.app.clone())),
        ("type", Amf0Value::Utf8String("nonprivate".to_string())),
        ("flashVer", Amf0Value::Utf8String(request.flash_version.clone())),
        ("tcUrl", Amf0Value::Utf8String(request.tc_url.clone())),
    ]);

    command(CONNECT, transaction_id, vec![command_object])
}

pub fn release_stream(transaction_id: f64, stream_key: &str) -> RtmpMessage {
    command(RELEASE_STREAM, transaction_id, vec![Amf0Value::Null, string(stream_key)])
}

pub fn fc_publish(transaction_id: f64, stream_key: &str) -> RtmpMessage {
    command(FC_PUBLISH, transaction_id, vec![Amf0Value::Null, string(stream_key)])
}

pub fn create_stream(transaction_id: f64) -> RtmpMessage {
    command(CREATE_STREAM, transaction_id, vec![Amf0Value::Null])
}

/// Must be sent on the message stream id returned by `createStream`
pub fn publish(transaction_id: f64, stream_key: &str, publish_type: PublishType) -> RtmpMessage {
    command(
        PUBLISH,
        transaction_id,
        vec![
            Amf0Value::Null,
            string(stream_key),
            string(publish_type.as_str()),
        ],
    )
}

pub fn fc_unpublish(transaction_id: f64, stream_key: &str) -> RtmpMessage {
    command(FC_UNPUBLISH, transaction_id, vec![Amf0Value::Null, string(stream_key)])
}

pub fn delete_stream(transaction_id: f64, stream_id: u32) -> RtmpMessage {
    command(
        DELETE_STREAM,
        transaction_id,
        vec![Amf0Value::Null, Amf0Value::Number(f64::from(stream_id))],
    )
}

/// The `@setDataFrame` data message servers store and replay to players as `onMetaData`
pub fn set_data_frame(metadata: &StreamMetadata) -> RtmpMessage {
    RtmpMessage::Amf0Data {
        values: vec![
            string(SET_DATA_FRAME),
            string(ON_METADATA),
            Amf0Value::EcmaArray(metadata.to_properties()),
        ],
    }
}

/// A server response to one of the commands above
#[derive(PartialEq, Debug, Clone)]
pub enum CommandResult {
    /// `_result` for the transaction
    Success { transaction_id: f64, values: Vec<Amf0Value> },

    /// `_error` for the transaction
    Failure { transaction_id: f64, values: Vec<Amf0Value> },

    /// `onStatus` notification, usually carrying an info object with a `code`
    Status { values: Vec<Amf0Value> },
}

impl CommandResult {
    /// Returns `None` for anything that is not a `_result`, `_error` or `onStatus` command
    pub fn from_message(message: &RtmpMessage) -> Option<CommandResult> {
        let (command_name, transaction_id, values) = match message {
            RtmpMessage::Amf0Command {
                command_name,
                transaction_id,
                values,
            } => (command_name.as_str(), *transaction_id, values.clone()),
            _ => return None,
        };

        match command_name {
            RESULT => Some(CommandResult::Success {
                transaction_id,
                values,
            }),
            ERROR => Some(CommandResult::Failure {
                transaction_id,
                values,
            }),
            ON_STATUS => Some(CommandResult::Status { values }),
            _ => None,
        }
    }

    pub fn transaction_id(&self) -> Option<f64> {
        match self {
            CommandResult::Success { transaction_id, .. } => Some(*transaction_id),
            CommandResult::Failure { transaction_id, .. } => Some(*transaction_id),
            CommandResult::Status { .. } => None,
        }
    }

    pub fn values(&self) -> &[Amf0Value] {
        match self {
            CommandResult::Success { values, .. } => values,
            CommandResult::Failure { values, .. } => values,
            CommandResult::Status { values } => values,
        }
    }

    /// The `code` of the first info object in the response, e.g. `NetStream.Publish.Start`
    pub fn status_code(&self) -> Option<&str> {
        self.values()
            .iter()
            .filter_map(|value| value.get_property("code"))
            .filter_map(Amf0Value::as_str)
            .next()
    }

    /// The message stream id carried by a successful `createStream` response
    pub fn created_stream_id(&self) -> Option<u32> {
        match self {
            CommandResult::Success { values, .. } => values
                .iter()
                .filter_map(Amf0Value::as_number)
                .next()
                .map(|id| id as u32),
            _ => None,
        }
    }
}

fn command(name: &str, transaction_id: f64, values: Vec<Amf0Value>) -> RtmpMessage {
    RtmpMessage::Amf0Command {
        command_name: name.to_string(),
        transaction_id,
        values,
    }
}

fn string(value: &str) -> Amf0Value {
    Amf0Value::Utf8String(value.to_string())
}
