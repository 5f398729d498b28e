use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Deserialize;

use super::{
    XmlRpcError, from_value,
    tag::*,
    value::{DateTime, Value},
};

/// Outcome of a method call as carried by a `<methodResponse>` document
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(Value),
    Fault { code: i32, message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fault {
    fault_code: i32,
    #[serde(default)]
    fault_string: String,
}

/// Encodes a `<methodCall>` document with one `<param>` per value.
pub fn encode_call(method: &str, params: &[Value]) -> Result<String, XmlRpcError> {
    let mut out = DocumentWriter::new()?;
    out.start(METHOD_CALL)?;
    out.text_element(METHOD_NAME, method)?;
    out.start(PARAMS)?;
    for param in params {
        out.start(PARAM)?;
        out.value(param)?;
        out.end(PARAM)?;
    }
    out.end(PARAMS)?;
    out.end(METHOD_CALL)?;
    out.finish()
}

/// Encodes a `<methodResponse>` document, mostly useful to stand in for the
/// remote service.
pub fn encode_response(response: &Response) -> Result<String, XmlRpcError> {
    let mut out = DocumentWriter::new()?;
    out.start(METHOD_RESPONSE)?;
    match response {
        Response::Success(value) => {
            out.start(PARAMS)?;
            out.start(PARAM)?;
            out.value(value)?;
            out.end(PARAM)?;
            out.end(PARAMS)?;
        }
        Response::Fault { code, message } => {
            let fault = BTreeMap::from([
                ("faultCode".to_owned(), Value::Int(*code)),
                ("faultString".to_owned(), Value::String(message.clone())),
            ]);
            out.start(FAULT)?;
            out.value(&Value::Struct(fault))?;
            out.end(FAULT)?;
        }
    }
    out.end(METHOD_RESPONSE)?;
    out.finish()
}

/// Decodes a `<methodResponse>` document.
///
/// A response with an empty `<params>` block decodes to [`Value::Nil`].
pub fn decode_response(xml: &str) -> Result<Response, XmlRpcError> {
    let mut parser = Parser::new(xml);
    parser.expect_start(METHOD_RESPONSE)?;

    let response = match parser.next_significant()? {
        Token::Start(name) if name == PARAMS => {
            let value = match parser.next_significant()? {
                Token::Start(name) if name == PARAM => {
                    parser.expect_start(VALUE)?;
                    let value = parser.value()?;
                    parser.expect_end(PARAM)?;
                    parser.expect_end(PARAMS)?;
                    value
                }
                Token::End(name) if name == PARAMS => Value::Nil,
                other => return Err(other.unexpected("<param>")),
            };
            Response::Success(value)
        }
        Token::Start(name) if name == FAULT => {
            parser.expect_start(VALUE)?;
            let value = parser.value()?;
            parser.expect_end(FAULT)?;
            let fault: Fault = from_value(value)
                .map_err(|e| XmlRpcError::Malformed(format!("invalid fault: {e}")))?;
            Response::Fault {
                code: fault.fault_code,
                message: fault.fault_string,
            }
        }
        other => return Err(other.unexpected("<params> or <fault>")),
    };

    parser.expect_end(METHOD_RESPONSE)?;
    Ok(response)
}

/// Decodes a `<methodCall>` document into the method name and its parameters.
pub fn decode_call(xml: &str) -> Result<(String, Vec<Value>), XmlRpcError> {
    let mut parser = Parser::new(xml);
    parser.expect_start(METHOD_CALL)?;
    parser.expect_start(METHOD_NAME)?;
    let method = parser.text(METHOD_NAME)?.trim().to_owned();

    let mut params = Vec::new();
    match parser.next_significant()? {
        Token::Start(name) if name == PARAMS => {
            loop {
                match parser.next_significant()? {
                    Token::Start(name) if name == PARAM => {
                        parser.expect_start(VALUE)?;
                        params.push(parser.value()?);
                        parser.expect_end(PARAM)?;
                    }
                    Token::End(name) if name == PARAMS => break,
                    other => return Err(other.unexpected("<param>")),
                }
            }
            parser.expect_end(METHOD_CALL)?;
        }
        Token::End(name) if name == METHOD_CALL => {}
        other => return Err(other.unexpected("<params>")),
    }

    Ok((method, params))
}

struct DocumentWriter {
    writer: Writer<Vec<u8>>,
}

impl DocumentWriter {
    fn new() -> Result<Self, XmlRpcError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    fn start(&mut self, name: &str) -> Result<(), XmlRpcError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), XmlRpcError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), XmlRpcError> {
        self.start(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn value(&mut self, value: &Value) -> Result<(), XmlRpcError> {
        self.start(VALUE)?;
        match value {
            Value::Int(n) => self.text_element(INT, &n.to_string())?,
            Value::Boolean(b) => self.text_element(BOOLEAN, if *b { "1" } else { "0" })?,
            Value::String(s) => self.text_element(STRING, s)?,
            Value::Double(d) => {
                if !d.is_finite() {
                    return Err(XmlRpcError::NonFiniteDouble(*d));
                }
                self.text_element(DOUBLE, &d.to_string())?
            }
            Value::DateTime(dt) => {
                self.text_element(DATETIME, &DateTime::new(*dt).to_string())?
            }
            Value::Base64(bytes) => self.text_element(BASE64, &STANDARD.encode(bytes))?,
            Value::Struct(members) => {
                self.start(STRUCT)?;
                for (name, member) in members {
                    self.start(MEMBER)?;
                    self.text_element(NAME, name)?;
                    self.value(member)?;
                    self.end(MEMBER)?;
                }
                self.end(STRUCT)?;
            }
            Value::Array(items) => {
                self.start(ARRAY)?;
                self.start(DATA)?;
                for item in items {
                    self.value(item)?;
                }
                self.end(DATA)?;
                self.end(ARRAY)?;
            }
            Value::Nil => {
                self.writer.write_event(Event::Empty(BytesStart::new(NIL)))?;
            }
        }
        self.end(VALUE)
    }

    fn finish(self) -> Result<String, XmlRpcError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}

#[derive(Debug)]
enum Token {
    Start(String),
    End(String),
    Text(String),
    Eof,
}

impl Token {
    fn unexpected(self, expected: &str) -> XmlRpcError {
        let found = match self {
            Token::Start(name) => format!("<{name}>"),
            Token::End(name) => format!("</{name}>"),
            Token::Text(text) => format!("text {:?}", text.trim()),
            Token::Eof => "end of document".to_owned(),
        };
        XmlRpcError::Malformed(format!("expected {expected}, found {found}"))
    }
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        let config = reader.config_mut();
        config.trim_text(false);
        config.expand_empty_elements = true;
        Self { reader }
    }

    fn next(&mut self) -> Result<Token, XmlRpcError> {
        loop {
            let token = match self.reader.read_event()? {
                Event::Start(e) => {
                    Token::Start(String::from_utf8(e.local_name().as_ref().to_vec())?)
                }
                Event::End(e) => Token::End(String::from_utf8(e.local_name().as_ref().to_vec())?),
                Event::Text(t) => Token::Text(t.unescape()?.into_owned()),
                Event::CData(c) => {
                    Token::Text(String::from_utf8(c.into_inner().into_owned())?)
                }
                Event::Eof => Token::Eof,
                // declarations, comments and processing instructions carry no data
                _ => continue,
            };
            return Ok(token);
        }
    }

    /// Next token that is not whitespace-only text
    fn next_significant(&mut self) -> Result<Token, XmlRpcError> {
        loop {
            match self.next()? {
                Token::Text(text) if text.trim().is_empty() => continue,
                token => return Ok(token),
            }
        }
    }

    fn expect_start(&mut self, expected: &str) -> Result<(), XmlRpcError> {
        match self.next_significant()? {
            Token::Start(name) if name == expected => Ok(()),
            other => Err(other.unexpected(&format!("<{expected}>"))),
        }
    }

    fn expect_end(&mut self, expected: &str) -> Result<(), XmlRpcError> {
        match self.next_significant()? {
            Token::End(name) if name == expected => Ok(()),
            other => Err(other.unexpected(&format!("</{expected}>"))),
        }
    }

    /// Text content up to the closing tag of `element`
    fn text(&mut self, element: &str) -> Result<String, XmlRpcError> {
        let mut text = String::new();
        loop {
            match self.next()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::End(name) if name == element => return Ok(text),
                other => return Err(other.unexpected(&format!("text of <{element}>"))),
            }
        }
    }

    /// Parses the content of a `<value>` whose start tag was just consumed.
    fn value(&mut self) -> Result<Value, XmlRpcError> {
        let mut untyped = String::new();
        loop {
            match self.next()? {
                Token::Text(chunk) => untyped.push_str(&chunk),
                // no type element means string, whitespace included
                Token::End(name) if name == VALUE => return Ok(Value::String(untyped)),
                Token::Start(kind) => {
                    let value = self.typed(&kind)?;
                    self.expect_end(VALUE)?;
                    return Ok(value);
                }
                other => return Err(other.unexpected("a value")),
            }
        }
    }

    fn typed(&mut self, kind: &str) -> Result<Value, XmlRpcError> {
        let value = match kind {
            INT | I4 => {
                let raw = self.text(kind)?;
                let raw = raw.trim();
                Value::Int(
                    raw.parse()
                        .map_err(|_| XmlRpcError::Malformed(format!("invalid int {raw:?}")))?,
                )
            }
            I8 => {
                let raw = self.text(kind)?;
                let raw = raw.trim();
                let wide: i64 = raw
                    .parse()
                    .map_err(|_| XmlRpcError::Malformed(format!("invalid i8 {raw:?}")))?;
                Value::Int(
                    i32::try_from(wide).map_err(|_| XmlRpcError::IntOutOfRange(raw.to_owned()))?,
                )
            }
            BOOLEAN => match self.text(kind)?.trim() {
                "1" | "true" => Value::Boolean(true),
                "0" | "false" => Value::Boolean(false),
                raw => return Err(XmlRpcError::Malformed(format!("invalid boolean {raw:?}"))),
            },
            STRING => Value::String(self.text(kind)?),
            DOUBLE => {
                let raw = self.text(kind)?;
                let raw = raw.trim();
                Value::Double(
                    raw.parse()
                        .map_err(|_| XmlRpcError::Malformed(format!("invalid double {raw:?}")))?,
                )
            }
            DATETIME => Value::from(DateTime::parse(&self.text(kind)?)?),
            BASE64 => {
                let raw: String = self
                    .text(kind)?
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                Value::Base64(STANDARD.decode(raw)?)
            }
            NIL => {
                self.text(kind)?;
                Value::Nil
            }
            STRUCT => self.members()?,
            ARRAY => {
                self.expect_start(DATA)?;
                let mut items = Vec::new();
                loop {
                    match self.next_significant()? {
                        Token::Start(name) if name == VALUE => items.push(self.value()?),
                        Token::End(name) if name == DATA => break,
                        other => return Err(other.unexpected("<value>")),
                    }
                }
                self.expect_end(ARRAY)?;
                Value::Array(items)
            }
            other => {
                return Err(XmlRpcError::Malformed(format!(
                    "unknown value type <{other}>"
                )));
            }
        };
        Ok(value)
    }

    fn members(&mut self) -> Result<Value, XmlRpcError> {
        let mut members = BTreeMap::new();
        loop {
            match self.next_significant()? {
                Token::Start(name) if name == MEMBER => {
                    self.expect_start(NAME)?;
                    let name = self.text(NAME)?;
                    self.expect_start(VALUE)?;
                    let value = self.value()?;
                    self.expect_end(MEMBER)?;
                    members.insert(name, value);
                }
                Token::End(name) if name == STRUCT => return Ok(Value::Struct(members)),
                other => return Err(other.unexpected("<member>")),
            }
        }
    }
}
