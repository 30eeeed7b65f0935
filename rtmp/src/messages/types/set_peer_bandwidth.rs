use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError};
use crate::messages::{MessageType, PeerBandwidthLimitType, RtmpMessage};

pub fn serialize(limit_type: PeerBandwidthLimitType, size: u32) -> Result<Bytes, EncodeError> {
    let type_id = match limit_type {
        PeerBandwidthLimitType::Hard => 0,
        PeerBandwidthLimitType::Soft => 1,
        PeerBandwidthLimitType::Dynamic => 2,
    };

    let mut cursor = Cursor::new(Vec::new());
    cursor.write_u32::<BigEndian>(size)?;
    cursor.write_u8(type_id)?;

    Ok(Bytes::from(cursor.into_inner()))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);
    let size = cursor.read_u32::<BigEndian>()?;
    let limit_type = match cursor.read_u8()? {
        0 => PeerBandwidthLimitType::Hard,
        1 => PeerBandwidthLimitType::Soft,
        2 => PeerBandwidthLimitType::Dynamic,
        _ => {
            return Err(DecodeError::InvalidMessageFormat {
                type_id: MessageType::SetPeerBandwidth.id(),
                reason: "unknown limit type",
            })
        }
    };

    Ok(RtmpMessage::SetPeerBandwidth { size, limit_type })
}
