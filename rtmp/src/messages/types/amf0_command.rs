use bytes::Bytes;
use pushcast_amf0::Amf0Value;
use std::io::Cursor;

use crate::chunk_io::{DecodeError, EncodeError};
use crate::messages::{MessageType, RtmpMessage};

pub fn serialize(
    command_name: String,
    transaction_id: f64,
    values: Vec<Amf0Value>,
) -> Result<Bytes, EncodeError> {
    let mut bytes = Vec::new();
    pushcast_amf0::write_value(&Amf0Value::Utf8String(command_name), &mut bytes)?;
    pushcast_amf0::write_value(&Amf0Value::Number(transaction_id), &mut bytes)?;
    for value in &values {
        pushcast_amf0::write_value(value, &mut bytes)?;
    }

    Ok(Bytes::from(bytes))
}

pub fn deserialize(data: Bytes) -> Result<RtmpMessage, DecodeError> {
    let mut cursor = Cursor::new(data);
    let mut values = pushcast_amf0::deserialize(&mut cursor)?.into_iter();

    let command_name = match values.next().and_then(Amf0Value::into_string) {
        Some(name) => name,
        None => return Err(invalid_format("command name is not a string")),
    };

    let transaction_id = match values.next().as_ref().and_then(Amf0Value::as_number) {
        Some(id) => id,
        None => return Err(invalid_format("transaction id is not a number")),
    };

    Ok(RtmpMessage::Amf0Command {
        command_name,
        transaction_id,
        values: values.collect(),
    })
}

fn invalid_format(reason: &'static str) -> DecodeError {
    DecodeError::InvalidMessageFormat {
        type_id: MessageType::Amf0Command.id(),
        reason,
    }
}
