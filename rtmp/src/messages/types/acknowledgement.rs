use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError};
use crate::messages::RtmpMessage;

pub fn serialize(sequence_number: u32) -> Result<Bytes, EncodeError> {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_u32::<BigEndian>(sequence_number)?;

    Ok(Bytes::from(cursor.into_inner()))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);

    Ok(RtmpMessage::Acknowledgement {
        sequence_number: cursor.read_u32::<BigEndian>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::{deserialize, serialize};
    use byteorder::{BigEndian, WriteBytesExt};
    use bytes::Bytes;
    use std::io::Cursor;

    use crate::messages::RtmpMessage;

    #[test]
    fn can_serialize_message() {
        let number = 523;
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(number).unwrap();
        let expected = cursor.into_inner();

        let raw_message = serialize(number).unwrap();

        assert_eq!(&raw_message[..], &expected[..]);
    }

    #[test]
    fn can_deserialize_message() {
        let number = 532;
        let expected = RtmpMessage::Acknowledgement {
            sequence_number: number,
        };

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u32::<BigEndian>(number).unwrap();

        let result = deserialize(Bytes::from(cursor.into_inner())).unwrap();
        assert_eq!(result, expected);
    }
}
