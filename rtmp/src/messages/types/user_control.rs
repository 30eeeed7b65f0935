use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError};
use crate::messages::{MessageType, RtmpMessage, UserControlEvent};
use crate::time::RtmpTimestamp;

const STREAM_BEGIN: u16 = 0;
const STREAM_EOF: u16 = 1;
const STREAM_DRY: u16 = 2;
const SET_BUFFER_LENGTH: u16 = 3;
const STREAM_IS_RECORDED: u16 = 4;
const PING_REQUEST: u16 = 6;
const PING_RESPONSE: u16 = 7;
const BUFFER_EMPTY: u16 = 31;
const BUFFER_READY: u16 = 32;

pub fn serialize(event: UserControlEvent) -> Result<Bytes, EncodeError> {
    let mut cursor = Cursor::new(Vec::new());
    let (event_id, first_value, buffer_length) = match event {
        UserControlEvent::StreamBegin { stream_id } => (STREAM_BEGIN, stream_id, None),
        UserControlEvent::StreamEof { stream_id } => (STREAM_EOF, stream_id, None),
        UserControlEvent::StreamDry { stream_id } => (STREAM_DRY, stream_id, None),
        UserControlEvent::SetBufferLength {
            stream_id,
            buffer_length,
        } => (SET_BUFFER_LENGTH, stream_id, Some(buffer_length)),
        UserControlEvent::StreamIsRecorded { stream_id } => (STREAM_IS_RECORDED, stream_id, None),
        UserControlEvent::PingRequest { timestamp } => (PING_REQUEST, timestamp.value, None),
        UserControlEvent::PingResponse { timestamp } => (PING_RESPONSE, timestamp.value, None),
        UserControlEvent::BufferEmpty { stream_id } => (BUFFER_EMPTY, stream_id, None),
        UserControlEvent::BufferReady { stream_id } => (BUFFER_READY, stream_id, None),
    };

    cursor.write_u16::<BigEndian>(event_id)?;
    cursor.write_u32::<BigEndian>(first_value)?;
    if let Some(length) = buffer_length {
        cursor.write_u32::<BigEndian>(length)?;
    }

    Ok(Bytes::from(cursor.into_inner()))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);
    let event_id = cursor.read_u16::<BigEndian>()?;

    let event = match event_id {
        STREAM_BEGIN => UserControlEvent::StreamBegin {
            stream_id: cursor.read_u32::<BigEndian>()?,
        },
        STREAM_EOF => UserControlEvent::StreamEof {
            stream_id: cursor.read_u32::<BigEndian>()?,
        },
        STREAM_DRY => UserControlEvent::StreamDry {
            stream_id: cursor.read_u32::<BigEndian>()?,
        },
        SET_BUFFER_LENGTH => UserControlEvent::SetBufferLength {
            stream_id: cursor.read_u32::<BigEndian>()?,
            buffer_length: cursor.read_u32::<BigEndian>()?,
        },
        STREAM_IS_RECORDED => UserControlEvent::StreamIsRecorded {
            stream_id: cursor.read_u32::<BigEndian>()?,
        },
        PING_REQUEST => UserControlEvent::PingRequest {
            timestamp: RtmpTimestamp::new(cursor.read_u32::<BigEndian>()?),
        },
        PING_RESPONSE => UserControlEvent::PingResponse {
            timestamp: RtmpTimestamp::new(cursor.read_u32::<BigEndian>()?),
        },
        BUFFER_EMPTY => UserControlEvent::BufferEmpty {
            stream_id: cursor.read_u32::<BigEndian>()?,
        },
        BUFFER_READY => UserControlEvent::BufferReady {
            stream_id: cursor.read_u32::<BigEndian>()?,
        },
        _ => {
            return Err(DecodeError::InvalidMessageFormat {
                type_id: MessageType::UserControl.id(),
                reason: "unknown user control event type",
            })
        }
    };

    Ok(RtmpMessage::UserControl { event })
}
