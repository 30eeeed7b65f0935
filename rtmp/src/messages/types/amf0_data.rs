use bytes::Bytes;
use pushcast_amf0::Amf0Value;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError};
use crate::messages::RtmpMessage;

pub fn serialize(values: &[Amf0Value]) -> Result<Bytes, EncodeError> {
    let bytes = pushcast_amf0::serialize(values)?;
    Ok(Bytes::from(bytes))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);
    let values = pushcast_amf0::deserialize(&mut cursor)?;

    Ok(RtmpMessage::Amf0Data { values })
}

#[cfg(test)]
mod tests {
    use super::{deserialize, serialize};
    use bytes::Bytes;
    use pushcast_amf0::Amf0Value;

    use crate::chunk_io::DecodeError;
    use crate::messages::RtmpMessage;

    #[test]
    fn can_serialize_message() {
        let values = vec![Amf0Value::Boolean(true), Amf0Value::Number(52.0)];
        let expected = pushcast_amf0::serialize(&values).unwrap();

        let result = serialize(&values).unwrap();

        assert_eq!(&result[..], &expected[..]);
    }

    #[test]
    fn can_deserialize_message() {
        let values = vec![
            Amf0Value::Utf8String("onMetaData".to_string()),
            Amf0Value::EcmaArray(vec![("width".to_string(), Amf0Value::Number(1280.0))]),
        ];
        let bytes = pushcast_amf0::serialize(&values).unwrap();

        let result = deserialize(Bytes::from(bytes)).unwrap();

        assert_eq!(result, RtmpMessage::Amf0Data { values });
    }

    #[test]
    fn truncated_value_is_reported() {
        let mut bytes = pushcast_amf0::serialize(&[Amf0Value::Number(1.0)]).unwrap();
        bytes.truncate(5);

        match deserialize(Bytes::from(bytes)) {
            Err(DecodeError::Truncated) => (),
            x => panic!("Expected truncated error, received {:?}", x),
        }
    }
}
