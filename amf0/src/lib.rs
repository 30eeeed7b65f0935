//! This crate provides functionality for encoding and decoding values based on the
//! Adobe AMF0 encoding specification, the self describing value format RTMP uses for
//! command and data messages.
//!
//! Object and ECMA array properties are kept as an ordered list of name/value pairs so
//! that re-encoding a decoded value yields the same bytes that were received.
//!
//! # Examples
//! ```
//! use std::io::Cursor;
//! use pushcast_amf0::{Amf0Value, serialize, deserialize};
//!
//! let object = Amf0Value::object(vec![
//!     ("app", Amf0Value::Number(99.0)),
//!     ("second", Amf0Value::Utf8String("test".to_string())),
//! ]);
//!
//! let input = vec![Amf0Value::Number(32.0), object, Amf0Value::Boolean(true)];
//!
//! let serialized_data = serialize(&input).unwrap();
//!
//! let mut serialized_cursor = Cursor::new(serialized_data);
//! let results = deserialize(&mut serialized_cursor).unwrap();
//!
//! assert_eq!(input, results);
//! ```

mod deserialization;
mod errors;
mod serialization;

use std::mem;

pub use crate::deserialization::{deserialize, read_value};
pub use crate::errors::{Amf0DecodeError, Amf0EncodeError};
pub use crate::serialization::{encode, serialize, write_value};

/// An ordered set of named properties, as carried by objects and ECMA arrays
pub type Amf0Properties = Vec<(String, Amf0Value)>;

/// The different kinds of values that can be represented in AMF0
#[derive(PartialEq, Debug, Clone)]
pub enum Amf0Value {
    Number(f64),
    Boolean(bool),
    Utf8String(String),
    Object(Amf0Properties),
    Null,
    Undefined,

    /// An associative array.  Shaped like an object but encoded with a leading count hint.
    EcmaArray(Amf0Properties),

    StrictArray(Vec<Amf0Value>),
}

impl Amf0Value {
    /// Builds an object from name/value pairs.  A name that appears more than once keeps
    /// its first position and its last value.
    pub fn object<K: Into<String>>(pairs: Vec<(K, Amf0Value)>) -> Amf0Value {
        let mut properties = Amf0Properties::with_capacity(pairs.len());
        for (name, value) in pairs {
            insert_property(&mut properties, name.into(), value);
        }

        Amf0Value::Object(properties)
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Amf0Value::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Amf0Value::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Amf0Value::Utf8String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn into_string(mut self) -> Option<String> {
        match &mut self {
            Amf0Value::Utf8String(value) => Some(mem::take(value)),
            _ => None,
        }
    }

    /// Returns the properties of an object or ECMA array
    pub fn properties(&self) -> Option<&Amf0Properties> {
        match self {
            Amf0Value::Object(properties) | Amf0Value::EcmaArray(properties) => Some(properties),
            _ => None,
        }
    }

    /// Looks up a named property on an object or ECMA array
    pub fn get_property(&self, name: &str) -> Option<&Amf0Value> {
        self.properties()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl Drop for Amf0Value {
    // Values decoded off the wire can nest arbitrarily deep, so children are moved onto a
    // heap allocated stack and dropped one level at a time.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(self, &mut pending);

        while let Some(mut value) = pending.pop() {
            take_children(&mut value, &mut pending);
        }
    }
}

fn take_children(value: &mut Amf0Value, pending: &mut Vec<Amf0Value>) {
    match value {
        Amf0Value::Object(properties) | Amf0Value::EcmaArray(properties) => {
            pending.extend(properties.drain(..).map(|(_, child)| child))
        }
        Amf0Value::StrictArray(values) => pending.append(values),
        _ => (),
    }
}

/// Adds a property, replacing the value in place if the name is already present
pub fn insert_property(properties: &mut Amf0Properties, name: String, value: Amf0Value) {
    match properties.iter_mut().find(|(key, _)| *key == name) {
        Some(existing) => existing.1 = value,
        None => properties.push((name, value)),
    }
}

mod markers {
    pub const NUMBER_MARKER: u8 = 0x00;
    pub const BOOLEAN_MARKER: u8 = 0x01;
    pub const STRING_MARKER: u8 = 0x02;
    pub const OBJECT_MARKER: u8 = 0x03;
    pub const NULL_MARKER: u8 = 0x05;
    pub const UNDEFINED_MARKER: u8 = 0x06;
    pub const ECMA_ARRAY_MARKER: u8 = 0x08;
    pub const OBJECT_END_MARKER: u8 = 0x09;
    pub const STRICT_ARRAY_MARKER: u8 = 0x0A;
    pub const UTF_8_EMPTY_MARKER: u16 = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_constructor_keeps_first_position_of_repeated_name() {
        let object = Amf0Value::object(vec![
            ("a", Amf0Value::Number(1.0)),
            ("b", Amf0Value::Null),
            ("a", Amf0Value::Number(3.0)),
        ]);

        let expected = Amf0Value::Object(vec![
            ("a".to_string(), Amf0Value::Number(3.0)),
            ("b".to_string(), Amf0Value::Null),
        ]);

        assert_eq!(object, expected);
    }

    #[test]
    fn can_look_up_property_on_ecma_array() {
        let value = Amf0Value::EcmaArray(vec![(
            "duration".to_string(),
            Amf0Value::Number(0.0),
        )]);

        assert_eq!(value.get_property("duration"), Some(&Amf0Value::Number(0.0)));
        assert_eq!(value.get_property("width"), None);
    }

    #[test]
    fn deeply_nested_value_can_be_dropped() {
        let mut value = Amf0Value::Null;
        for index in 0..200_000 {
            value = if index % 2 == 0 {
                Amf0Value::StrictArray(vec![value, Amf0Value::Number(1.0)])
            } else {
                Amf0Value::object(vec![("child", value)])
            };
        }

        drop(value);
    }

    #[test]
    fn into_string_returns_string_contents() {
        assert_eq!(
            Amf0Value::Utf8String("live".to_string()).into_string(),
            Some("live".to_string())
        );
        assert_eq!(Amf0Value::Null.into_string(), None);
    }

    #[test]
    fn accessors_return_none_for_other_variants() {
        let value = Amf0Value::Utf8String("onStatus".to_string());

        assert_eq!(value.as_str(), Some("onStatus"));
        assert_eq!(value.as_number(), None);
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.properties(), None);
    }
}
