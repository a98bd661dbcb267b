/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Walks the top level of a record and collects its fields.

use crate::error::MarshalError;
use crate::tag::{self, FieldMetadata};
use crate::value::{Kind, Value, ValueSerializer};
use crate::Annotations;
use serde::ser::{Impossible, Serialize, SerializeMap, SerializeStruct, Serializer};
use std::borrow::Cow;
use tracing::trace;

/// One declared field of a record, not yet encoded.
#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) name: Cow<'static, str>,
    pub(crate) meta: FieldMetadata,
    pub(crate) value: Value,
}

/// Captures the fields of `record` in declaration order, skipping those annotated `-`.
///
/// Records serialized as maps (any struct with a `#[serde(flatten)]` field, or a string-keyed
/// map) contribute one field per entry, in serialization order.
pub(crate) fn fields<T: Serialize + ?Sized>(
    record: &T,
    annotations: Annotations,
) -> Result<Vec<Field>, MarshalError> {
    record.serialize(RecordSerializer {
        annotations,
        dereferenced: false,
    })
}

struct RecordSerializer {
    annotations: Annotations,
    dereferenced: bool,
}

type Refused = Impossible<Vec<Field>, MarshalError>;

impl RecordSerializer {
    fn refuse(kind: Kind) -> Result<Refused, MarshalError> {
        Err(MarshalError::NotAStruct(kind))
    }
}

impl Serializer for RecordSerializer {
    type Ok = Vec<Field>;
    type Error = MarshalError;

    type SerializeSeq = Refused;
    type SerializeTuple = Refused;
    type SerializeTupleStruct = Refused;
    type SerializeTupleVariant = Refused;
    type SerializeMap = EntryCollector;
    type SerializeStruct = FieldCollector;
    type SerializeStructVariant = Refused;

    fn serialize_bool(self, _v: bool) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Bool))
    }

    fn serialize_i8(self, _v: i8) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Signed))
    }

    fn serialize_i16(self, _v: i16) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Signed))
    }

    fn serialize_i32(self, _v: i32) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Signed))
    }

    fn serialize_i64(self, _v: i64) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Signed))
    }

    fn serialize_i128(self, _v: i128) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Signed))
    }

    fn serialize_u8(self, _v: u8) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unsigned))
    }

    fn serialize_u16(self, _v: u16) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unsigned))
    }

    fn serialize_u32(self, _v: u32) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unsigned))
    }

    fn serialize_u64(self, _v: u64) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unsigned))
    }

    fn serialize_u128(self, _v: u128) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unsigned))
    }

    fn serialize_f32(self, _v: f32) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Float))
    }

    fn serialize_f64(self, _v: f64) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Float))
    }

    fn serialize_char(self, _v: char) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Char))
    }

    fn serialize_str(self, _v: &str) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::String))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Bytes))
    }

    fn serialize_none(self) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NullRecord)
    }

    // Only one level of optional is looked through.
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<Field>, MarshalError> {
        if self.dereferenced {
            return Err(MarshalError::NotAStruct(Kind::Optional));
        }
        value.serialize(RecordSerializer {
            dereferenced: true,
            ..self
        })
    }

    fn serialize_unit(self) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unit))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Unit))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Vec<Field>, MarshalError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Vec<Field>, MarshalError> {
        Err(MarshalError::NotAStruct(Kind::Variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Refused, MarshalError> {
        Self::refuse(Kind::Seq)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Refused, MarshalError> {
        Self::refuse(Kind::Seq)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Refused, MarshalError> {
        Self::refuse(Kind::Seq)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Refused, MarshalError> {
        Self::refuse(Kind::Variant)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<EntryCollector, MarshalError> {
        Ok(EntryCollector {
            fields: FieldCollector {
                annotations: self.annotations,
                fields: Vec::with_capacity(len.unwrap_or_default()),
            },
            key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<FieldCollector, MarshalError> {
        Ok(FieldCollector {
            annotations: self.annotations,
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Refused, MarshalError> {
        Self::refuse(Kind::Variant)
    }
}

pub(crate) struct FieldCollector {
    annotations: Annotations,
    fields: Vec<Field>,
}

impl FieldCollector {
    fn collect<T: Serialize + ?Sized>(
        &mut self,
        name: Cow<'static, str>,
        value: &T,
    ) -> Result<(), MarshalError> {
        let meta = tag::resolve(&name, (self.annotations)(&name));
        if meta.omitted {
            trace!(field = %name, "field ignored");
            return Ok(());
        }
        let value = value
            .serialize(ValueSerializer)
            .map_err(|source| MarshalError::Encoding {
                field: name.to_string(),
                source,
            })?;
        self.fields.push(Field { name, meta, value });
        Ok(())
    }
}

impl SerializeStruct for FieldCollector {
    type Ok = Vec<Field>;
    type Error = MarshalError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), MarshalError> {
        self.collect(Cow::Borrowed(key), value)
    }

    fn end(self) -> Result<Vec<Field>, MarshalError> {
        Ok(self.fields)
    }
}

/// Collects the entries of a record serialized as a map. Keys must be strings.
pub(crate) struct EntryCollector {
    fields: FieldCollector,
    key: Option<String>,
}

impl SerializeMap for EntryCollector {
    type Ok = Vec<Field>;
    type Error = MarshalError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), MarshalError> {
        match key.serialize(ValueSerializer) {
            Ok(Value::Str(key)) => {
                self.key = Some(key);
                Ok(())
            }
            _ => Err(MarshalError::NotAStruct(Kind::Map)),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), MarshalError> {
        match self.key.take() {
            Some(key) => self.fields.collect(Cow::Owned(key), value),
            None => Err(MarshalError::Serialize(
                "map value serialized before its key".to_string(),
            )),
        }
    }

    fn end(self) -> Result<Vec<Field>, MarshalError> {
        Ok(self.fields.fields)
    }
}

#[cfg(test)]
mod test {
    use super::fields;
    use crate::error::MarshalError;
    use crate::value::{Kind, Value};
    use serde::Serialize;
    use std::collections::HashMap;

    fn none(_: &str) -> Option<&'static str> {
        None
    }

    fn hide_secret(field: &str) -> Option<&'static str> {
        match field {
            "secret" => Some("-"),
            "title" => Some("Title"),
            _ => None,
        }
    }

    #[derive(Serialize)]
    struct Movie {
        title: String,
        year: u16,
        secret: Unserializable,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("never serialized"))
        }
    }

    #[derive(Serialize)]
    struct Wrapper(Movie);

    fn movie() -> Movie {
        Movie {
            title: "Alien".into(),
            year: 1979,
            secret: Unserializable,
        }
    }

    #[test]
    fn fields_in_declaration_order() {
        let captured = fields(&movie(), hide_secret).unwrap();
        let names: Vec<_> = captured.iter().map(|f| f.meta.wire_name.as_str()).collect();
        assert_eq!(names, vec!["Title", "year"]);
        assert_eq!(captured[1].value, Value::UInt(1979));
    }

    #[test]
    fn ignored_fields_are_never_serialized() {
        match fields(&movie(), none) {
            Err(MarshalError::Encoding { field, .. }) => assert_eq!(field, "secret"),
            other => panic!("expected an encoding error, got {:?}", other),
        }
    }

    #[test]
    fn one_optional_level_is_looked_through() {
        assert_eq!(fields(&Some(movie()), hide_secret).unwrap().len(), 2);
        assert_eq!(fields(&Wrapper(movie()), hide_secret).unwrap().len(), 2);
        assert!(matches!(
            fields(&Some(Some(movie())), hide_secret),
            Err(MarshalError::NotAStruct(Kind::Optional))
        ));
        assert!(matches!(
            fields(&None::<Movie>, hide_secret),
            Err(MarshalError::NullRecord)
        ));
    }

    #[test]
    fn non_structs_are_refused() {
        let mut map = HashMap::new();
        map.insert(1_u8, "Alien");
        let cases: Vec<(Result<_, _>, Kind)> = vec![
            (fields(&1_u8, none), Kind::Unsigned),
            (fields("text", none), Kind::String),
            (fields(&vec![1, 2], none), Kind::Seq),
            (fields(&map, none), Kind::Map),
            (fields(&(), none), Kind::Unit),
        ];
        for (result, expected) in cases {
            match result {
                Err(MarshalError::NotAStruct(kind)) => assert_eq!(kind, expected),
                other => panic!("expected NotAStruct({}), got {:?}", expected, other),
            }
        }
    }

    #[derive(Serialize)]
    struct Release {
        title: String,
        #[serde(flatten)]
        detail: Detail,
    }

    #[derive(Serialize)]
    struct Detail {
        year: u16,
        secret: Unserializable,
    }

    #[test]
    fn flattened_records_contribute_every_entry() {
        let release = Release {
            title: "Alien".into(),
            detail: Detail {
                year: 1979,
                secret: Unserializable,
            },
        };
        let captured = fields(&release, hide_secret).unwrap();
        let names: Vec<_> = captured.iter().map(|f| f.meta.wire_name.as_str()).collect();
        assert_eq!(names, vec!["Title", "year"]);
        assert_eq!(captured[1].name, "year");
        assert_eq!(captured[1].value, Value::UInt(1979));
    }

    #[test]
    fn string_keyed_maps_are_records() {
        let mut map = HashMap::new();
        map.insert("title", "Alien");
        let captured = fields(&map, hide_secret).unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].meta.wire_name, "Title");
        assert_eq!(captured[0].value, Value::Str("Alien".into()));
    }
}
