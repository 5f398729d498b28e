use std::iter;

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, VariantAccess, Visitor,
    value::{MapDeserializer, SeqDeserializer, StringDeserializer},
};

use super::{
    XmlRpcError,
    value::{DATETIME_TOKEN, DateTime, Value},
};

/// Builds a typed record out of a decoded XML-RPC [`Value`].
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, XmlRpcError> {
    T::deserialize(value)
}

impl<'de> IntoDeserializer<'de, XmlRpcError> for Value {
    type Deserializer = Value;

    fn into_deserializer(self) -> Value {
        self
    }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = XmlRpcError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, XmlRpcError> {
        match self {
            Value::Int(n) => visitor.visit_i32(n),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::String(s) => visitor.visit_string(s),
            Value::Double(d) => visitor.visit_f64(d),
            // a one-member map keyed by the token, so `Value` gets its DateTime back
            Value::DateTime(dt) => {
                let raw = DateTime::new(dt).to_string();
                let mut map: MapDeserializer<'de, _, XmlRpcError> =
                    MapDeserializer::new(iter::once((DATETIME_TOKEN.to_owned(), raw)));
                let value = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(value)
            }
            Value::Base64(bytes) => visitor.visit_byte_buf(bytes),
            Value::Struct(members) => {
                let mut map: MapDeserializer<'de, _, XmlRpcError> =
                    MapDeserializer::new(members.into_iter());
                let value = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(value)
            }
            Value::Array(items) => {
                let mut seq: SeqDeserializer<_, XmlRpcError> =
                    SeqDeserializer::new(items.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Value::Nil => visitor.visit_unit(),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, XmlRpcError> {
        match self {
            Value::Nil => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, XmlRpcError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, XmlRpcError> {
        match self {
            Value::DateTime(dt) => visitor.visit_string(DateTime::new(dt).to_string()),
            other => de::Deserializer::deserialize_any(other, visitor),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, XmlRpcError> {
        match self {
            Value::Nil => visitor.visit_unit(),
            other => Err(de::Error::invalid_type(other.unexpected(), &visitor)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, XmlRpcError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, XmlRpcError> {
        if name != DATETIME_TOKEN {
            return visitor.visit_newtype_struct(self);
        }
        match self {
            Value::DateTime(dt) => visitor.visit_string(DateTime::new(dt).to_string()),
            // some deployments send dates as plain strings
            Value::String(s) => visitor.visit_string(s),
            other => Err(de::Error::invalid_type(other.unexpected(), &visitor)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, XmlRpcError> {
        match self {
            Value::String(variant) => {
                let variant: StringDeserializer<XmlRpcError> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Struct(members) if members.len() == 1 => {
                let mut members = members.into_iter();
                match members.next() {
                    Some((variant, value)) => {
                        visitor.visit_enum(EnumDeserializer { variant, value })
                    }
                    None => Err(de::Error::invalid_length(0, &"a single member")),
                }
            }
            other => Err(de::Error::invalid_type(other.unexpected(), &visitor)),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, XmlRpcError> {
        drop(self);
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char
        bytes byte_buf seq tuple tuple_struct map struct identifier
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = XmlRpcError;
    type Variant = VariantDeserializer;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantDeserializer), XmlRpcError> {
        let variant: StringDeserializer<XmlRpcError> = self.variant.into_deserializer();
        let variant = seed.deserialize(variant)?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = XmlRpcError;

    fn unit_variant(self) -> Result<(), XmlRpcError> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<T::Value, XmlRpcError> {
        seed.deserialize(self.value)
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, XmlRpcError> {
        de::Deserializer::deserialize_seq(self.value, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, XmlRpcError> {
        de::Deserializer::deserialize_map(self.value, visitor)
    }
}
