//! Module contains functionality for encoding values into bytes based on the AMF0
//! specification

use crate::errors::Amf0EncodeError;
use crate::markers;
use crate::Amf0Value;
use byteorder::{BigEndian, WriteBytesExt};

/// Encodes a sequence of values back to back into one buffer
pub fn serialize(values: &[Amf0Value]) -> Result<Vec<u8>, Amf0EncodeError> {
    let mut bytes = vec![];
    for value in values {
        write_value(value, &mut bytes)?;
    }

    Ok(bytes)
}

/// Encodes a single value, including its leading type marker
pub fn encode(value: &Amf0Value) -> Result<Vec<u8>, Amf0EncodeError> {
    let mut bytes = vec![];
    write_value(value, &mut bytes)?;
    Ok(bytes)
}

/// Appends the encoded form of the value to the buffer.  Nested containers are walked with
/// an explicit stack, so arbitrarily deep values can be encoded.
pub fn write_value(value: &Amf0Value, bytes: &mut Vec<u8>) -> Result<(), Amf0EncodeError> {
    let mut pending = vec![Pending::Value(value)];

    while let Some(next) = pending.pop() {
        match next {
            Pending::Value(value) => write_single_value(value, bytes, &mut pending)?,
            Pending::Property(name, value) => {
                write_short_string(name, bytes)
                    .map_err(|_| Amf0EncodeError::PropertyNameTooLong { length: name.len() })?;
                write_single_value(value, bytes, &mut pending)?;
            }

            Pending::ObjectEnd => {
                bytes.write_u16::<BigEndian>(markers::UTF_8_EMPTY_MARKER)?;
                bytes.push(markers::OBJECT_END_MARKER);
            }
        }
    }

    Ok(())
}

/// Work left to do while encoding, popped in reverse order of pushing
enum Pending<'a> {
    Value(&'a Amf0Value),
    Property(&'a str, &'a Amf0Value),
    ObjectEnd,
}

/// Writes a scalar in full, or the marker and header of a container along with the work
/// needed to write its members
fn write_single_value<'a>(
    value: &'a Amf0Value,
    bytes: &mut Vec<u8>,
    pending: &mut Vec<Pending<'a>>,
) -> Result<(), Amf0EncodeError> {
    match value {
        Amf0Value::Number(val) => serialize_number(*val, bytes),
        Amf0Value::Boolean(val) => {
            bytes.push(markers::BOOLEAN_MARKER);
            bytes.push(*val as u8);
            Ok(())
        }
        Amf0Value::Utf8String(val) => {
            bytes.push(markers::STRING_MARKER);
            write_short_string(val, bytes)
        }
        Amf0Value::Object(properties) => {
            bytes.push(markers::OBJECT_MARKER);
            push_properties(properties, pending);
            Ok(())
        }
        Amf0Value::Null => {
            bytes.push(markers::NULL_MARKER);
            Ok(())
        }
        Amf0Value::Undefined => {
            bytes.push(markers::UNDEFINED_MARKER);
            Ok(())
        }
        Amf0Value::EcmaArray(properties) => {
            bytes.push(markers::ECMA_ARRAY_MARKER);
            bytes.write_u32::<BigEndian>(count_as_u32(properties.len())?)?;
            push_properties(properties, pending);
            Ok(())
        }
        Amf0Value::StrictArray(values) => {
            bytes.push(markers::STRICT_ARRAY_MARKER);
            bytes.write_u32::<BigEndian>(count_as_u32(values.len())?)?;
            pending.extend(values.iter().rev().map(Pending::Value));
            Ok(())
        }
    }
}

fn serialize_number(value: f64, bytes: &mut Vec<u8>) -> Result<(), Amf0EncodeError> {
    bytes.push(markers::NUMBER_MARKER);
    bytes.write_f64::<BigEndian>(value)?;
    Ok(())
}

/// Length prefixed string without a type marker.  Fails (without writing anything) when the
/// string does not fit the 16 bit length field.
fn write_short_string(value: &str, bytes: &mut Vec<u8>) -> Result<(), Amf0EncodeError> {
    if value.len() > u16::MAX as usize {
        return Err(Amf0EncodeError::StringTooLong {
            length: value.len(),
        });
    }

    bytes.write_u16::<BigEndian>(value.len() as u16)?;
    bytes.extend_from_slice(value.as_bytes());
    Ok(())
}

fn push_properties<'a>(properties: &'a [(String, Amf0Value)], pending: &mut Vec<Pending<'a>>) {
    pending.push(Pending::ObjectEnd);
    pending.extend(
        properties
            .iter()
            .rev()
            .map(|(name, value)| Pending::Property(name.as_str(), value)),
    );
}

fn count_as_u32(length: usize) -> Result<u32, Amf0EncodeError> {
    if length > u32::MAX as usize {
        return Err(Amf0EncodeError::ArrayTooLong { length });
    }

    Ok(length as u32)
}
