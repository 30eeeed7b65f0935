use std::{io, string};
use thiserror::Error;

/// Errors that can occur while decoding AMF0 values
#[derive(Debug, Error)]
pub enum Amf0DecodeError {
    /// The leading type byte did not match any supported AMF0 type
    #[error("Encountered unknown AMF0 type marker {marker:#04x}")]
    UnknownType { marker: u8 },

    /// The input ended in the middle of a value
    #[error("Hit end of the byte buffer but was expecting more data")]
    Truncated,

    /// A string did not contain valid utf-8
    #[error("String value was not valid utf-8: {0}")]
    InvalidUtf8(#[from] string::FromUtf8Error),

    /// An I/O error other than running out of bytes
    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for Amf0DecodeError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Amf0DecodeError::Truncated,
            _ => Amf0DecodeError::Io(error),
        }
    }
}

/// Errors that can occur while encoding AMF0 values
#[derive(Debug, Error)]
pub enum Amf0EncodeError {
    #[error("String length of {length} is greater than 65,535")]
    StringTooLong { length: usize },

    #[error("Property name length of {length} is greater than 65,535")]
    PropertyNameTooLong { length: usize },

    #[error("Array or property count of {length} does not fit in 32 bits")]
    ArrayTooLong { length: usize },

    #[error("{0}")]
    Io(#[from] io::Error),
}
