use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError};
use crate::messages::RtmpMessage;

pub fn serialize(size: u32) -> Result<Bytes, EncodeError> {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_u32::<BigEndian>(size)?;

    Ok(Bytes::from(cursor.into_inner()))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);

    Ok(RtmpMessage::WindowAcknowledgement {
        size: cursor.read_u32::<BigEndian>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::{deserialize, serialize};
    use byteorder::{BigEndian, WriteBytesExt};
    use bytes::Bytes;
    use std::io::Cursor;

    use crate::chunk_io::DecodeError;
    use crate::messages::RtmpMessage;

    #[test]
    fn can_serialize_message() {
        let size = 2500000;
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(size).unwrap();
        let expected = cursor.into_inner();

        let raw_message = serialize(size).unwrap();

        assert_eq!(&raw_message[..], &expected[..]);
    }

    #[test]
    fn can_deserialize_message() {
        let size = 532;
        let expected = RtmpMessage::WindowAcknowledgement { size };

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(size).unwrap();

        let result = deserialize(Bytes::from(cursor.into_inner())).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn short_body_is_truncated() {
        match deserialize(Bytes::from_static(&[0, 1, 2])) {
            Err(DecodeError::Truncated) => (),
            x => panic!("Expected truncated error, received {:?}", x),
        }
    }
}
