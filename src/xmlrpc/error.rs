use std::fmt::Display;

use serde::{de, ser};
use thiserror::Error;

/// Error raised while encoding or decoding XML-RPC payloads
#[derive(Debug, Error)]
pub enum XmlRpcError {
    #[error("{0}")]
    Message(String),
    #[error("malformed XML-RPC document: {0}")]
    Malformed(String),
    #[error("integer {0} does not fit in an XML-RPC int")]
    IntOutOfRange(String),
    #[error("invalid dateTime.iso8601 value {0:?}")]
    InvalidDateTime(String),
    #[error("double {0} cannot be represented in XML-RPC")]
    NonFiniteDouble(f64),
    #[error("struct member names must be strings")]
    KeyMustBeString,
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ser::Error for XmlRpcError {
    fn custom<T: Display>(msg: T) -> Self {
        XmlRpcError::Message(msg.to_string())
    }
}

impl de::Error for XmlRpcError {
    fn custom<T: Display>(msg: T) -> Self {
        XmlRpcError::Message(msg.to_string())
    }
}
