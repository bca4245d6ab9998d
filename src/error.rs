use serde::de::Error as SerdeError;
use std::{fmt, io};
use thiserror::Error;

/// Boxed error returned by converters, propagated untouched to the caller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

///
/// Errors raised while parsing a single raw literal, either by the built-in
/// scalar parsers or by [`StrDeserializer`](crate::de::StrDeserializer).
///
#[derive(Debug, PartialEq, Error)]
pub enum LiteralError {
    #[error("empty string given")]
    EmptyStr,
    #[error("invalid number [{0}]")]
    NumberError(String),
    #[error("number [{0}] is out of range")]
    OutOfRange(String),
    #[error("syntax error in [{0}]")]
    SyntaxError(String),
    #[error("unsupported")]
    Unsupported,
    #[error("{0}")]
    CustomError(String),
}

impl SerdeError for LiteralError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::CustomError(format!("{}", msg))
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum PairError {
    #[error("empty key in line [{0}]")]
    EmptyKey(String),
    #[error("no value for key {0}")]
    IncompletePair(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("recursive type detected {ty} in field {field}")]
    RecursiveType {
        field: &'static str,
        ty: &'static str,
    },

    #[error("max depth {max} exceeded at [{path}], you might have a type loop in your structure")]
    DepthExceeded { path: String, max: usize },

    #[error("key [{key}] is not usable as an int index in [{var}]")]
    InvalidIndex { key: String, var: String },

    #[error("index {index} detected from [{var}] is >= to array length {len}")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        var: String,
    },

    #[error("index {index} detected from [{var}] is >= to the max sequence length {max}")]
    IndexTooLarge {
        index: usize,
        max: usize,
        var: String,
    },

    #[error("unsupported type [{0}], please consider adding a custom converter")]
    UnsupportedType(&'static str),

    #[error("failed to get field [{field}] in [{ty}]")]
    UnknownField { field: String, ty: &'static str },

    #[error("path ended before reaching a value in [{0}]")]
    IncompletePath(&'static str),

    #[error("unexpected path segment [{0}] below a leaf value")]
    TrailingPath(String),

    #[error(transparent)]
    Conversion(BoxError),

    #[error(transparent)]
    Pair(#[from] PairError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
