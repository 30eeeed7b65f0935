//! This module contains functionality to decode values from bytes that were encoded via
//! the AMF0 specification

use crate::errors::Amf0DecodeError;
use crate::markers;
use crate::{insert_property, Amf0Properties, Amf0Value};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};
use std::mem;

/// Reads AMF0 values back to back until the readable byte stream is exhausted.
///
/// Running out of bytes between two values ends the sequence, running out of bytes
/// inside a value is reported as `Amf0DecodeError::Truncated`.
pub fn deserialize<R: Read>(bytes: &mut R) -> Result<Vec<Amf0Value>, Amf0DecodeError> {
    let mut results = vec![];

    while let Some(marker) = read_marker(bytes)? {
        results.push(read_value_with_marker(marker, bytes)?);
    }

    Ok(results)
}

/// Reads exactly one AMF0 value, starting at its type marker
pub fn read_value<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DecodeError> {
    let marker = bytes.read_u8()?;
    read_value_with_marker(marker, bytes)
}

fn read_marker<R: Read>(bytes: &mut R) -> Result<Option<u8>, Amf0DecodeError> {
    let mut buffer = [0_u8; 1];
    loop {
        match bytes.read(&mut buffer) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buffer[0])),
            Err(ref error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
}

/// Reads one value whose marker was already consumed.
///
/// Containers are tracked on an explicit stack instead of by recursion, so the nesting depth
/// of the input is only bounded by its length.
fn read_value_with_marker<R: Read>(
    marker: u8,
    bytes: &mut R,
) -> Result<Amf0Value, Amf0DecodeError> {
    let mut open = Vec::new();
    let mut completed = begin_value(marker, bytes, &mut open)?;

    while let Some(container) = open.last_mut() {
        if let Some(value) = completed.take() {
            container.add(value);
        }

        completed = match container.next_member(bytes)? {
            Some(marker) => begin_value(marker, bytes, &mut open)?,
            None => open.pop().map(OpenContainer::finish),
        };
    }

    // The loop only ends once the outermost container was closed, or when the value was a
    // scalar to begin with
    completed.ok_or(Amf0DecodeError::Truncated)
}

/// Reads a scalar value in full.  A container marker instead opens a new container on the
/// stack and returns `None`, leaving its members to the caller.
fn begin_value<R: Read>(
    marker: u8,
    bytes: &mut R,
    open: &mut Vec<OpenContainer>,
) -> Result<Option<Amf0Value>, Amf0DecodeError> {
    let value = match marker {
        markers::NUMBER_MARKER => parse_number(bytes)?,
        markers::BOOLEAN_MARKER => parse_bool(bytes)?,
        markers::STRING_MARKER => Amf0Value::Utf8String(parse_string(bytes)?),
        markers::NULL_MARKER => Amf0Value::Null,
        markers::UNDEFINED_MARKER => Amf0Value::Undefined,
        markers::OBJECT_MARKER => {
            open.push(OpenContainer::properties(false));
            return Ok(None);
        }

        markers::ECMA_ARRAY_MARKER => {
            // Encoders are not consistent about the element count, while every one of them
            // ends the array with the object end marker.  The count is only a hint.
            let _associative_count = bytes.read_u32::<BigEndian>()?;
            open.push(OpenContainer::properties(true));
            return Ok(None);
        }

        markers::STRICT_ARRAY_MARKER => {
            let count = bytes.read_u32::<BigEndian>()?;

            // The count comes off the wire, so it never sizes an allocation up front
            open.push(OpenContainer::StrictArray {
                values: Vec::new(),
                remaining: count,
            });
            return Ok(None);
        }

        _ => return Err(Amf0DecodeError::UnknownType { marker }),
    };

    Ok(Some(value))
}

fn parse_number<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DecodeError> {
    let number = bytes.read_f64::<BigEndian>()?;
    Ok(Amf0Value::Number(number))
}

fn parse_bool<R: Read>(bytes: &mut R) -> Result<Amf0Value, Amf0DecodeError> {
    let value = bytes.read_u8()?;
    Ok(Amf0Value::Boolean(value != 0))
}

fn parse_string<R: Read>(bytes: &mut R) -> Result<String, Amf0DecodeError> {
    let length = bytes.read_u16::<BigEndian>()?;
    let mut buffer = vec![0_u8; length as usize];
    bytes.read_exact(&mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}

/// An object, ECMA array or strict array whose members are still being read
enum OpenContainer {
    Properties {
        properties: Amf0Properties,
        pending_name: String,
        is_ecma_array: bool,
    },

    StrictArray {
        values: Vec<Amf0Value>,
        remaining: u32,
    },
}

impl OpenContainer {
    fn properties(is_ecma_array: bool) -> OpenContainer {
        OpenContainer::Properties {
            properties: Amf0Properties::new(),
            pending_name: String::new(),
            is_ecma_array,
        }
    }

    /// Reads up to and including the marker of the next member, or returns `None` once the
    /// container has no members left.
    fn next_member<R: Read>(&mut self, bytes: &mut R) -> Result<Option<u8>, Amf0DecodeError> {
        match self {
            OpenContainer::Properties { pending_name, .. } => {
                let name = parse_string(bytes)?;
                let marker = bytes.read_u8()?;
                if name.is_empty() && marker == markers::OBJECT_END_MARKER {
                    return Ok(None);
                }

                *pending_name = name;
                Ok(Some(marker))
            }

            OpenContainer::StrictArray { remaining, .. } => {
                if *remaining == 0 {
                    return Ok(None);
                }

                *remaining -= 1;
                Ok(Some(bytes.read_u8()?))
            }
        }
    }

    fn add(&mut self, value: Amf0Value) {
        match self {
            OpenContainer::Properties {
                properties,
                pending_name,
                ..
            } => insert_property(properties, mem::take(pending_name), value),

            OpenContainer::StrictArray { values, .. } => values.push(value),
        }
    }

    fn finish(self) -> Amf0Value {
        match self {
            OpenContainer::Properties {
                properties,
                is_ecma_array: true,
                ..
            } => Amf0Value::EcmaArray(properties),

            OpenContainer::Properties { properties, .. } => Amf0Value::Object(properties),
            OpenContainer::StrictArray { values, .. } => Amf0Value::StrictArray(values),
        }
    }
}
