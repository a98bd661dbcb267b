/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Captures any `Serialize` value as an inspectable [`Value`] tree.
//!
//! The marshaler needs to ask questions of a field value (what kind is it, is it empty, what
//! does its first element look like) before deciding how to encode it. Serde only offers a push
//! model, so the value is first recorded here and then examined.

use crate::error::EncodeError;
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// The shape of a captured value, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    Null,
    Optional,
    Unit,
    Bool,
    Signed,
    Unsigned,
    Float,
    Char,
    String,
    Bytes,
    Seq,
    Map,
    Struct,
    Variant,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Optional => "optional",
            Kind::Unit => "unit",
            Kind::Bool => "bool",
            Kind::Signed => "signed integer",
            Kind::Unsigned => "unsigned integer",
            Kind::Float => "float",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Seq => "sequence",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Variant => "enum variant",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    /// `None`
    Null,
    /// `Some(_)`
    Present(Box<Value>),
    /// `()`, unit structs and `PhantomData`
    Unit,
    Bool(bool),
    Int(i128),
    UInt(u128),
    Float(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    /// Sequences, tuples and tuple structs
    Seq(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Struct(Vec<(&'static str, Value)>),
    /// Newtype, tuple and struct variants. Unit variants are captured as their name.
    Variant {
        name: &'static str,
        value: Box<Value>,
    },
}

impl Value {
    pub(crate) fn capture<T: Serialize + ?Sized>(value: &T) -> Result<Value, EncodeError> {
        value.serialize(ValueSerializer)
    }

    pub(crate) fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Present(_) => Kind::Optional,
            Value::Unit => Kind::Unit,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Signed,
            Value::UInt(_) => Kind::Unsigned,
            Value::Float(_) => Kind::Float,
            Value::Char(_) => Kind::Char,
            Value::Str(_) => Kind::String,
            Value::Bytes(_) => Kind::Bytes,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Struct(_) => Kind::Struct,
            Value::Variant { .. } => Kind::Variant,
        }
    }

    /// Looks through one level of `Some`.
    pub(crate) fn deref_once(&self) -> &Value {
        match self {
            Value::Present(inner) => inner,
            other => other,
        }
    }

    /// The zero value test applied to record fields.
    ///
    /// A present optional is never empty, even when it wraps an empty value. Structs, units,
    /// chars and enum variants are never empty.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Present(_)
            | Value::Unit
            | Value::Char(_)
            | Value::Struct(_)
            | Value::Variant { .. } => false,
        }
    }
}

/// Writes the captured value back out, so composites can be rendered with `serde_json`
/// exactly as if the original value had been given to it.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Present(inner) => serializer.serialize_some(inner.as_ref()),
            Value::Unit => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => match i64::try_from(*i) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_i128(*i),
            },
            Value::UInt(u) => match u64::try_from(*u) {
                Ok(small) => serializer.serialize_u64(small),
                Err(_) => serializer.serialize_u128(*u),
            },
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Variant { name, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, value.as_ref())?;
                map.end()
            }
        }
    }
}

pub(crate) struct ValueSerializer;

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SeqCapture;
    type SerializeTuple = SeqCapture;
    type SerializeTupleStruct = SeqCapture;
    type SerializeTupleVariant = VariantCapture<SeqCapture>;
    type SerializeMap = MapCapture;
    type SerializeStruct = StructCapture;
    type SerializeStructVariant = VariantCapture<StructCapture>;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, EncodeError> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(Value::UInt(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(Value::UInt(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(Value::UInt(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        Ok(Value::UInt(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, EncodeError> {
        Ok(Value::UInt(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, EncodeError> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, EncodeError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, EncodeError> {
        Ok(Value::Present(Box::new(value.serialize(ValueSerializer)?)))
    }

    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Ok(Value::Unit)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, EncodeError> {
        Ok(Value::Unit)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        value.serialize(ValueSerializer)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        Ok(Value::Variant {
            name: variant,
            value: Box::new(value.serialize(ValueSerializer)?),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCapture, EncodeError> {
        Ok(SeqCapture {
            items: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCapture, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqCapture, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantCapture<SeqCapture>, EncodeError> {
        Ok(VariantCapture {
            name: variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCapture, EncodeError> {
        Ok(MapCapture {
            entries: Vec::with_capacity(len.unwrap_or_default()),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<StructCapture, EncodeError> {
        Ok(StructCapture {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantCapture<StructCapture>, EncodeError> {
        Ok(VariantCapture {
            name: variant,
            inner: self.serialize_struct(name, len)?,
        })
    }
}

pub(crate) struct SeqCapture {
    items: Vec<Value>,
}

impl SerializeSeq for SeqCapture {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqCapture {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqCapture {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        SerializeSeq::end(self)
    }
}

pub(crate) struct MapCapture {
    entries: Vec<(Value, Value)>,
    next_key: Option<Value>,
}

impl SerializeMap for MapCapture {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.next_key = Some(key.serialize(ValueSerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| EncodeError::Custom("map value serialized before its key".into()))?;
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Map(self.entries))
    }
}

pub(crate) struct StructCapture {
    fields: Vec<(&'static str, Value)>,
}

impl ser::SerializeStruct for StructCapture {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.fields.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Struct(self.fields))
    }
}

pub(crate) struct VariantCapture<I> {
    name: &'static str,
    inner: I,
}

impl ser::SerializeTupleVariant for VariantCapture<SeqCapture> {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Variant {
            name: self.name,
            value: Box::new(SerializeSeq::end(self.inner)?),
        })
    }
}

impl ser::SerializeStructVariant for VariantCapture<StructCapture> {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Variant {
            name: self.name,
            value: Box::new(ser::SerializeStruct::end(self.inner)?),
        })
    }
}
