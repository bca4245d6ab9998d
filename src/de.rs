//!
//! `serde` deserializer over a single raw variable value.
//!
//! Backs [`Registry::register_serde`](crate::Registry::register_serde): any
//! `DeserializeOwned` type whose shape fits in one string (scalars, unit
//! enums, newtypes, flat sequences) can be read straight from a variable.
//!
use crate::{
    error::LiteralError,
    value::{parse_bool, parse_signed, parse_unsigned},
};
use serde::{
    de::{self, DeserializeSeed, IntoDeserializer},
    forward_to_deserialize_any,
};

pub const DEFAULT_ARRAY_SEP: char = ',';

#[derive(Debug, PartialEq)]
enum Sign {
    Signed,
    Unsigned,
}

#[derive(Debug, PartialEq)]
enum LiteralState {
    String,
    Int(Sign),
    Double,
}

///
/// Find the index of `sep` in `raw`, skipping separators found inside
/// double-quoted sections (`\"` doesn't close a quote).
///
fn lookup_array_sep(raw: &str, sep: char) -> Option<usize> {
    let mut quoted = false;
    let mut escaped = false;

    for (idx, ch) in raw.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            _ if ch == sep && !quoted => return Some(idx),
            _ => {}
        }
    }

    None
}

/// Splits `raw` into array elements, empty input gives no element.
fn split_array(raw: &str, sep: char) -> Vec<&str> {
    let mut data = vec![];
    let mut cursor = raw.trim();

    if cursor.is_empty() {
        return data;
    }

    while let Some(idx) = lookup_array_sep(cursor, sep) {
        data.push(cursor[..idx].trim());
        cursor = &cursor[idx + sep.len_utf8()..];
    }
    data.push(cursor.trim());

    data
}

#[inline]
fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

///
/// Deserializer reading one raw value.
///
/// Sequences are split on the array separator (`,` by default), so
/// `a,"b,c",d` gives three elements.
///
#[derive(Debug, Clone, Copy)]
pub struct StrDeserializer<'de> {
    inner: &'de str,
    array_sep: char,
}

impl<'de> StrDeserializer<'de> {
    #[inline]
    pub fn new(raw: &'de str) -> Self {
        Self::with_separator(raw, DEFAULT_ARRAY_SEP)
    }

    #[inline]
    pub fn with_separator(raw: &'de str, array_sep: char) -> Self {
        Self {
            inner: raw.trim(),
            array_sep,
        }
    }

    fn scan(&self) -> Option<LiteralState> {
        self.inner.chars().fold(None, |state, ch| {
            match state {
                // int(s) -> double | string
                Some(LiteralState::Int(s)) => {
                    if ch.is_ascii_digit() {
                        Some(LiteralState::Int(s))
                    } else if ch == '.' {
                        Some(LiteralState::Double)
                    } else {
                        Some(LiteralState::String)
                    }
                }
                // double -> double | string
                Some(LiteralState::Double) => {
                    if ch.is_ascii_digit() {
                        Some(LiteralState::Double)
                    } else {
                        Some(LiteralState::String)
                    }
                }
                Some(LiteralState::String) => Some(LiteralState::String),
                None => {
                    if ch.is_ascii_digit() {
                        Some(LiteralState::Int(Sign::Unsigned))
                    } else if ch == '-' {
                        Some(LiteralState::Int(Sign::Signed))
                    } else {
                        Some(LiteralState::String)
                    }
                }
            }
        })
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident : $ty:ty = $parse:ident),* $(,)?) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: de::Visitor<'de>,
        {
            visitor.$visit($parse::<$ty>(self.inner)?)
        }
    )*};
}

impl<'de> de::Deserializer<'de> for StrDeserializer<'de> {
    type Error = LiteralError;

    ///
    /// Infer the literal kind out of its shape:
    /// quoted str, boolean, then scan phase
    ///
    /// - raw -> int | double | string .
    /// - int -> double | string .
    /// - double -> double | string .
    /// - string -> string .
    ///
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        if self.inner.starts_with('"') {
            self.deserialize_str(visitor)
        } else if self.inner == "true" || self.inner == "false" {
            self.deserialize_bool(visitor)
        } else {
            match self.scan() {
                Some(LiteralState::Int(Sign::Unsigned)) => self.deserialize_u64(visitor),
                // a lone `-` stays a string
                Some(LiteralState::Int(Sign::Signed)) if self.inner.len() > 1 => {
                    self.deserialize_i64(visitor)
                }
                Some(LiteralState::Double) => self.deserialize_f64(visitor),
                Some(_) => self.deserialize_str(visitor),
                None => Err(LiteralError::EmptyStr),
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(parse_bool(self.inner)?)
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8 = parse_signed,
        deserialize_i16 => visit_i16: i16 = parse_signed,
        deserialize_i32 => visit_i32: i32 = parse_signed,
        deserialize_i64 => visit_i64: i64 = parse_signed,
        deserialize_i128 => visit_i128: i128 = parse_signed,
        deserialize_u8 => visit_u8: u8 = parse_unsigned,
        deserialize_u16 => visit_u16: u16 = parse_unsigned,
        deserialize_u32 => visit_u32: u32 = parse_unsigned,
        deserialize_u64 => visit_u64: u64 = parse_unsigned,
        deserialize_u128 => visit_u128: u128 = parse_unsigned,
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.inner
            .parse::<f32>()
            .map_err(|_| LiteralError::NumberError(String::from(self.inner)))
            .and_then(move |v| visitor.visit_f32(v))
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.inner
            .parse::<f64>()
            .map_err(|_| LiteralError::NumberError(String::from(self.inner)))
            .and_then(move |v| visitor.visit_f64(v))
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let raw = unquote(self.inner);
        let mut chars = raw.chars();

        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor.visit_char(ch),
            (None, _) => Err(LiteralError::EmptyStr),
            _ => Err(LiteralError::SyntaxError(String::from(raw))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(unquote(self.inner))
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        if self.inner.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(Elements {
            inner: split_array(self.inner, self.array_sep).into_iter(),
            array_sep: self.array_sep,
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(unquote(self.inner).into_deserializer())
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(LiteralError::Unsupported)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(LiteralError::Unsupported)
    }

    forward_to_deserialize_any! {
        bytes byte_buf ignored_any
    }
}

/// Elements of a flat array value.
struct Elements<'de> {
    inner: std::vec::IntoIter<&'de str>,
    array_sep: char,
}

impl<'de> de::SeqAccess<'de> for Elements<'de> {
    type Error = LiteralError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.inner.next() {
            Some(raw) => seed
                .deserialize(StrDeserializer::with_separator(raw, self.array_sep))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.inner.len())
    }
}
