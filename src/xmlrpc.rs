//! Minimal XML-RPC codec.
//!
//! [`Value`] is the wire-level value tree. [`encode_call`] and [`decode_response`]
//! convert between it and XML documents, while [`to_value`] and [`from_value`]
//! bridge typed records through serde so request and response shapes never
//! need hand-written field copying.

mod codec;
mod de;
mod error;
mod ser;
mod value;

pub use codec::{Response, decode_call, decode_response, encode_call, encode_response};
pub use de::from_value;
pub use error::XmlRpcError;
pub use ser::to_value;
pub use value::{Ack, Blob, DateTime, Redacted, RedactedList, Value};

/// Element names of the XML-RPC document format
pub(crate) mod tag {
    pub const METHOD_CALL: &str = "methodCall";
    pub const METHOD_NAME: &str = "methodName";
    pub const METHOD_RESPONSE: &str = "methodResponse";
    pub const PARAMS: &str = "params";
    pub const PARAM: &str = "param";
    pub const FAULT: &str = "fault";
    pub const VALUE: &str = "value";

    pub const INT: &str = "int";
    pub const I4: &str = "i4";
    pub const I8: &str = "i8";
    pub const BOOLEAN: &str = "boolean";
    pub const STRING: &str = "string";
    pub const DOUBLE: &str = "double";
    pub const DATETIME: &str = "dateTime.iso8601";
    pub const BASE64: &str = "base64";
    pub const NIL: &str = "nil";

    pub const STRUCT: &str = "struct";
    pub const MEMBER: &str = "member";
    pub const NAME: &str = "name";
    pub const ARRAY: &str = "array";
    pub const DATA: &str = "data";
}
