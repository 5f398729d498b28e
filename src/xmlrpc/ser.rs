use std::collections::BTreeMap;

use serde::{
    Serialize,
    ser::{self, Impossible},
};

use super::{
    XmlRpcError,
    value::{DATETIME_TOKEN, DateTime, Value},
};

/// Converts any serializable value into an XML-RPC [`Value`].
///
/// `None` members are left out of structs, unit enum variants become their
/// (renamed) string, byte buffers become `base64`.
pub fn to_value<T>(value: &T) -> Result<Value, XmlRpcError>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

fn int<N>(n: N) -> Result<Value, XmlRpcError>
where
    N: TryInto<i32> + ToString + Copy,
{
    n.try_into()
        .map(Value::Int)
        .map_err(|_| XmlRpcError::IntOutOfRange(n.to_string()))
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = XmlRpcError;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeStruct;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, XmlRpcError> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, XmlRpcError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, XmlRpcError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, XmlRpcError> {
        Ok(Value::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, XmlRpcError> {
        int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value, XmlRpcError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, XmlRpcError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, XmlRpcError> {
        int(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Value, XmlRpcError> {
        int(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Value, XmlRpcError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, XmlRpcError> {
        if !v.is_finite() {
            return Err(XmlRpcError::NonFiniteDouble(v));
        }
        Ok(Value::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, XmlRpcError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, XmlRpcError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, XmlRpcError> {
        Ok(Value::Base64(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, XmlRpcError> {
        Ok(Value::Nil)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, XmlRpcError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, XmlRpcError> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, XmlRpcError> {
        Ok(Value::Nil)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, XmlRpcError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, XmlRpcError> {
        if name != DATETIME_TOKEN {
            return value.serialize(self);
        }
        let raw = value.serialize(DateTimeSerializer)?;
        Ok(DateTime::parse(&raw)?.into())
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, XmlRpcError> {
        let mut members = BTreeMap::new();
        members.insert(variant.to_owned(), to_value(value)?);
        Ok(Value::Struct(members))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, XmlRpcError> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, XmlRpcError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeArray, XmlRpcError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, XmlRpcError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeStruct, XmlRpcError> {
        Ok(SerializeStruct::default())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SerializeStruct, XmlRpcError> {
        Ok(SerializeStruct::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant, XmlRpcError> {
        Ok(SerializeStructVariant {
            variant,
            members: BTreeMap::new(),
        })
    }
}

struct SerializeArray {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), XmlRpcError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), XmlRpcError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), XmlRpcError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), XmlRpcError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        let mut members = BTreeMap::new();
        members.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Struct(members))
    }
}

#[derive(Default)]
struct SerializeStruct {
    members: BTreeMap<String, Value>,
    next_key: Option<String>,
}

impl SerializeStruct {
    fn insert(&mut self, name: String, value: Value) {
        // XML-RPC has no portable null, unset members are simply left out
        if !value.is_nil() {
            self.members.insert(name, value);
        }
    }
}

impl ser::SerializeMap for SerializeStruct {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), XmlRpcError> {
        let name = match to_value(key)? {
            Value::String(s) => s,
            Value::Int(n) => n.to_string(),
            _ => return Err(XmlRpcError::KeyMustBeString),
        };
        self.next_key = Some(name);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), XmlRpcError> {
        let name = self
            .next_key
            .take()
            .ok_or_else(|| XmlRpcError::Message("map value without a key".into()))?;
        let value = to_value(value)?;
        self.insert(name, value);
        Ok(())
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        Ok(Value::Struct(self.members))
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), XmlRpcError> {
        let value = to_value(value)?;
        self.insert(key.to_owned(), value);
        Ok(())
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        Ok(Value::Struct(self.members))
    }
}

struct SerializeStructVariant {
    variant: &'static str,
    members: BTreeMap<String, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = XmlRpcError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), XmlRpcError> {
        let value = to_value(value)?;
        if !value.is_nil() {
            self.members.insert(key.to_owned(), value);
        }
        Ok(())
    }

    fn end(self) -> Result<Value, XmlRpcError> {
        let mut outer = BTreeMap::new();
        outer.insert(self.variant.to_owned(), Value::Struct(self.members));
        Ok(Value::Struct(outer))
    }
}

/// Accepts only the string form of a [`DateTime`].
struct DateTimeSerializer;

impl DateTimeSerializer {
    fn reject<T>(&self) -> Result<T, XmlRpcError> {
        Err(XmlRpcError::Message(
            "dateTime values must serialize as strings".into(),
        ))
    }
}

impl ser::Serializer for DateTimeSerializer {
    type Ok = String;
    type Error = XmlRpcError;

    type SerializeSeq = Impossible<String, XmlRpcError>;
    type SerializeTuple = Impossible<String, XmlRpcError>;
    type SerializeTupleStruct = Impossible<String, XmlRpcError>;
    type SerializeTupleVariant = Impossible<String, XmlRpcError>;
    type SerializeMap = Impossible<String, XmlRpcError>;
    type SerializeStruct = Impossible<String, XmlRpcError>;
    type SerializeStructVariant = Impossible<String, XmlRpcError>;

    fn serialize_str(self, v: &str) -> Result<String, XmlRpcError> {
        Ok(v.to_owned())
    }

    fn serialize_bool(self, _v: bool) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_i8(self, _v: i8) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_i16(self, _v: i16) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_i32(self, _v: i32) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_i64(self, _v: i64) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_u8(self, _v: u8) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_u16(self, _v: u16) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_u32(self, _v: u32) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_u64(self, _v: u64) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_f32(self, _v: f32) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_f64(self, _v: f64) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_char(self, _v: char) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_none(self) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_unit(self) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, XmlRpcError> {
        self.reject()
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, XmlRpcError> {
        self.reject()
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, XmlRpcError> {
        self.reject()
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, XmlRpcError> {
        self.reject()
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, XmlRpcError> {
        self.reject()
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, XmlRpcError> {
        self.reject()
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, XmlRpcError> {
        self.reject()
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, XmlRpcError> {
        self.reject()
    }
}
