use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError, MAX_CHUNK_SIZE};
use crate::messages::RtmpMessage;

pub fn serialize(size: u32) -> Result<Bytes, EncodeError> {
    if size == 0 || size > MAX_CHUNK_SIZE {
        return Err(EncodeError::InvalidChunkSize { size });
    }

    let mut cursor = Cursor::new(Vec::new());
    cursor.write_u32::<BigEndian>(size)?;

    Ok(Bytes::from(cursor.into_inner()))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);
    let size = cursor.read_u32::<BigEndian>()?;

    // The first bit must be zero
    if size == 0 || size > MAX_CHUNK_SIZE {
        return Err(DecodeError::InvalidChunkSize { size });
    }

    Ok(RtmpMessage::SetChunkSize { size })
}

#[cfg(test)]
mod tests {
    use super::{deserialize, serialize};
    use byteorder::{BigEndian, WriteBytesExt};
    use bytes::Bytes;
    use std::io::Cursor;

    use crate::chunk_io::{DecodeError, EncodeError};
    use crate::messages::RtmpMessage;

    #[test]
    fn can_serialize_message() {
        let size = 523;
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(size).unwrap();
        let expected = cursor.into_inner();

        let raw_message = serialize(size).unwrap();

        assert_eq!(&raw_message[..], &expected[..]);
    }

    #[test]
    fn can_deserialize_message() {
        let size = 532;
        let expected = RtmpMessage::SetChunkSize { size };

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(size).unwrap();

        let result = deserialize(Bytes::from(cursor.into_inner())).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn size_with_reserved_bit_set_is_rejected() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(0x8000_0001).unwrap();

        match deserialize(Bytes::from(cursor.into_inner())) {
            Err(DecodeError::InvalidChunkSize { size: 0x8000_0001 }) => (),
            x => panic!("Expected invalid chunk size error, received {:?}", x),
        }

        match serialize(0) {
            Err(EncodeError::InvalidChunkSize { size: 0 }) => (),
            x => panic!("Expected invalid chunk size error, received {:?}", x),
        }
    }
}
