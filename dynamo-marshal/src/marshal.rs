/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Builds attribute sets out of records.

use crate::collection::encode_collection;
use crate::error::{EncodeError, MarshalError};
use crate::infer::infer;
use crate::record::{self, Field};
use crate::scalar::{binary, encode_scalar, numeric, reported_kind};
use crate::value::Value;
use crate::{Annotations, Item};
use dynamo_types::{AttributeSet, AttributeType, AttributeValue, Blob};
use serde::Serialize;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};

/// Marshals `item` into an attribute set, using the annotations it declares.
///
/// See [`marshal_with`] for the rules applied to each field.
pub fn marshal<T: Item + ?Sized>(item: &T) -> Result<AttributeSet, MarshalError> {
    marshal_with(item, T::annotation)
}

/// Marshals `record` into an attribute set, looking up field annotations with `annotations`.
///
/// `record` must serialize as a struct, optionally behind one `Option`. Each field, in
/// declaration order:
/// - is skipped when annotated `-`,
/// - is skipped when its value is empty (`""`, `0`, `false`, `None`, an empty collection),
///   since the store cannot hold an empty attribute,
/// - is encoded as its forced category if it has one, or as the inferred category otherwise,
/// - is dropped if the encoding is empty, e.g. a set whose members were all empty.
///
/// Two fields ending up under the same attribute name fail the whole call.
pub fn marshal_with<T: Serialize + ?Sized>(
    record: &T,
    annotations: Annotations,
) -> Result<AttributeSet, MarshalError> {
    let fields = record::fields(record, annotations)?;
    let mut attributes = AttributeSet::with_capacity(fields.len());
    for Field { name, meta, value } in fields {
        if value.is_empty() {
            trace!(field = %name, omitempty = meta.omit_if_empty, "empty field skipped");
            continue;
        }
        let encoded = match meta.forced_type {
            Some(forced) => encode_forced(forced, &value),
            None => encode_inferred(&value),
        }
        .map_err(|source| MarshalError::Encoding {
            field: name.to_string(),
            source,
        })?;
        let attribute = match encoded {
            Some(attribute) if attribute.is_valid() => attribute,
            _ => {
                trace!(field = %name, "field encoded to nothing, dropped");
                continue;
            }
        };
        trace!(
            field = %name,
            attribute = %meta.wire_name,
            attribute_type = %attribute.attribute_type(),
            "field encoded"
        );
        match attributes.entry(meta.wire_name) {
            Entry::Occupied(existing) => {
                return Err(MarshalError::DuplicateName(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                slot.insert(attribute);
            }
        }
    }
    debug!(attributes = attributes.len(), "record marshaled");
    Ok(attributes)
}

/// Encodes a standalone value, such as a key part or a condition operand, as its inferred
/// category.
///
/// Unlike record fields, zero and `false` are kept. `None` is returned only when there is
/// nothing to store: an absent optional, empty text or an empty collection.
///
/// ```
/// use dynamo_marshal::to_attribute_value;
/// use dynamo_types::AttributeValue;
///
/// assert_eq!(to_attribute_value(&1999).unwrap(), Some(AttributeValue::N("1999".into())));
/// assert_eq!(to_attribute_value("").unwrap(), None);
/// ```
pub fn to_attribute_value<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Option<AttributeValue>, EncodeError> {
    let value = Value::capture(value)?;
    Ok(encode_inferred(&value)?.filter(AttributeValue::is_valid))
}

/// Encodes a standalone value as the `forced` category.
pub fn to_attribute_value_as<T: Serialize + ?Sized>(
    value: &T,
    forced: AttributeType,
) -> Result<Option<AttributeValue>, EncodeError> {
    let value = Value::capture(value)?;
    Ok(encode_forced(forced, &value)?.filter(AttributeValue::is_valid))
}

fn elements(value: &Value) -> &[Value] {
    match value.deref_once() {
        Value::Seq(items) => items,
        other => unreachable!("set category inferred for a {}", other.kind()),
    }
}

fn encode_inferred(value: &Value) -> Result<Option<AttributeValue>, EncodeError> {
    let category = match infer(value)? {
        Some(category) => category,
        None => return Ok(None),
    };
    let number = |item: &Value| -> Result<String, EncodeError> {
        numeric(item).unwrap_or_else(|| Err(EncodeError::InvalidDataType(reported_kind(item))))
    };
    let blob = |item: &Value| -> Result<Blob, EncodeError> {
        binary(item)
            .map(Blob::new)
            .ok_or_else(|| EncodeError::InvalidDataType(reported_kind(item)))
    };
    Ok(Some(match category {
        AttributeType::S => AttributeValue::S(encode_scalar(value)?),
        AttributeType::N => AttributeValue::N(encode_scalar(value)?),
        AttributeType::B => AttributeValue::B(blob(value)?),
        AttributeType::Ss => AttributeValue::Ss(encode_collection(elements(value), encode_scalar)?),
        AttributeType::Ns => AttributeValue::Ns(encode_collection(elements(value), number)?),
        AttributeType::Bs => AttributeValue::Bs(encode_collection(elements(value), blob)?),
    }))
}

fn encode_forced(
    forced: AttributeType,
    value: &Value,
) -> Result<Option<AttributeValue>, EncodeError> {
    let mismatch = |found: &Value| EncodeError::ForcedTypeMismatch {
        forced,
        found: reported_kind(found),
    };
    let number = |item: &Value| numeric(item).unwrap_or_else(|| Err(mismatch(item)));
    let blob = |item: &Value| binary(item).map(Blob::new).ok_or_else(|| mismatch(item));

    if forced.is_scalar() {
        return Ok(Some(match forced {
            AttributeType::S => AttributeValue::S(encode_scalar(value)?),
            AttributeType::N => AttributeValue::N(number(value)?),
            _ => AttributeValue::B(blob(value)?),
        }));
    }

    let items = match value.deref_once() {
        Value::Seq(items) => items,
        Value::Null => return Ok(None),
        _ => return Err(mismatch(value)),
    };
    Ok(Some(match forced {
        AttributeType::Ss => AttributeValue::Ss(encode_collection(items, encode_scalar)?),
        AttributeType::Ns => AttributeValue::Ns(encode_collection(items, number)?),
        _ => AttributeValue::Bs(encode_collection(items, blob)?),
    }))
}

#[cfg(test)]
mod test {
    use super::{marshal_with, to_attribute_value, to_attribute_value_as};
    use crate::error::{EncodeError, MarshalError};
    use crate::value::Kind;
    use dynamo_types::{AttributeType, AttributeValue, Blob};
    use serde::Serialize;

    fn no_annotations(_: &str) -> Option<&'static str> {
        None
    }

    #[derive(Serialize)]
    struct Everything {
        name: &'static str,
        count: i32,
        ratio: f64,
        flag: bool,
        tags: Vec<&'static str>,
        scores: Vec<u32>,
        #[serde(with = "serde_bytes")]
        raw: Vec<u8>,
        nested: Nested,
        maybe: Option<u8>,
    }

    #[derive(Serialize)]
    struct Nested {
        a: u8,
    }

    #[test]
    fn every_category_is_inferred() {
        let record = Everything {
            name: "n",
            count: -3,
            ratio: 0.25,
            flag: true,
            tags: vec!["x", "y"],
            scores: vec![3, 1, 3],
            raw: b"AWS".to_vec(),
            nested: Nested { a: 1 },
            maybe: Some(0),
        };
        let attributes = marshal_with(&record, no_annotations).unwrap();
        assert_eq!(attributes["name"], AttributeValue::S("n".into()));
        assert_eq!(attributes["count"], AttributeValue::N("-3".into()));
        assert_eq!(attributes["ratio"], AttributeValue::N("0.25".into()));
        assert_eq!(attributes["flag"], AttributeValue::N("1".into()));
        assert_eq!(attributes["tags"], AttributeValue::Ss(vec!["x".into(), "y".into()]));
        assert_eq!(attributes["scores"], AttributeValue::Ns(vec!["3".into(), "1".into()]));
        assert_eq!(attributes["raw"], AttributeValue::B(Blob::new(*b"AWS")));
        assert_eq!(attributes["nested"], AttributeValue::S(r#"{"a":1}"#.into()));
        // A present optional is not empty even when it wraps zero.
        assert_eq!(attributes["maybe"], AttributeValue::N("0".into()));
        assert_eq!(attributes.len(), 9);
    }

    #[test]
    fn empty_values_are_skipped() {
        let record = Everything {
            name: "",
            count: 0,
            ratio: 0.0,
            flag: false,
            tags: vec![],
            scores: vec![],
            raw: vec![],
            nested: Nested { a: 0 },
            maybe: None,
        };
        let attributes = marshal_with(&record, no_annotations).unwrap();
        assert_eq!(attributes.len(), 1, "only the struct survives: {:?}", attributes);
        assert!(attributes.contains_key("nested"));
    }

    #[test]
    fn sets_of_empty_members_are_dropped() {
        #[derive(Serialize)]
        struct Tags {
            tags: Vec<&'static str>,
        }
        let attributes = marshal_with(&Tags { tags: vec!["", ""] }, no_annotations).unwrap();
        assert!(attributes.is_empty());
    }

    #[test]
    fn forced_types() {
        #[derive(Serialize)]
        struct Forced {
            year: &'static str,
            code: u32,
            digest: &'static str,
            ids: Vec<&'static str>,
            chunks: Vec<Vec<u8>>,
        }
        fn annotations(field: &str) -> Option<&'static str> {
            match field {
                "year" => Some("Year,N"),
                "code" => Some(",S"),
                "digest" => Some(",B"),
                "ids" => Some(",NS"),
                "chunks" => Some(",BS"),
                _ => None,
            }
        }
        let record = Forced {
            year: "1999",
            code: 7,
            digest: "AWS",
            ids: vec!["1", "2.5", "1"],
            chunks: vec![vec![1, 2], vec![], vec![3]],
        };
        let attributes = marshal_with(&record, annotations).unwrap();
        assert_eq!(attributes["Year"], AttributeValue::N("1999".into()));
        assert_eq!(attributes["code"], AttributeValue::S("7".into()));
        assert_eq!(attributes["digest"], AttributeValue::B(Blob::new(*b"AWS")));
        assert_eq!(attributes["ids"], AttributeValue::Ns(vec!["1".into(), "2.5".into()]));
        assert_eq!(
            attributes["chunks"],
            AttributeValue::Bs(vec![Blob::new(vec![1, 2]), Blob::new(vec![3])])
        );
    }

    #[test]
    fn forced_numbers_drop_empty_text() {
        #[derive(Serialize)]
        struct Sparse {
            ids: Vec<&'static str>,
            year: Option<String>,
            id: u8,
        }
        fn annotations(field: &str) -> Option<&'static str> {
            match field {
                "ids" => Some(",NS"),
                "year" => Some(",N"),
                _ => None,
            }
        }
        let attributes = marshal_with(
            &Sparse {
                ids: vec!["1", "", "2"],
                year: Some(String::new()),
                id: 1,
            },
            annotations,
        )
        .unwrap();
        assert_eq!(attributes["ids"], AttributeValue::Ns(vec!["1".into(), "2".into()]));
        assert!(!attributes.contains_key("year"));
        assert_eq!(attributes.len(), 2);

        let all_blank = marshal_with(
            &Sparse {
                ids: vec!["", ""],
                year: None,
                id: 1,
            },
            annotations,
        )
        .unwrap();
        assert!(!all_blank.contains_key("ids"));
    }

    #[test]
    fn incompatible_forced_types_are_refused() {
        #[derive(Serialize)]
        struct Bad {
            title: &'static str,
        }
        fn as_number_set(_: &str) -> Option<&'static str> {
            Some(",NS")
        }
        fn as_number(_: &str) -> Option<&'static str> {
            Some(",N")
        }
        match marshal_with(&Bad { title: "Alien" }, as_number_set) {
            Err(MarshalError::Encoding {
                field,
                source: EncodeError::ForcedTypeMismatch { forced, found },
            }) => {
                assert_eq!(field, "title");
                assert_eq!(forced, AttributeType::Ns);
                assert_eq!(found, Kind::String);
            }
            other => panic!("expected a forced type mismatch, got {:?}", other),
        }
        assert!(matches!(
            marshal_with(&Bad { title: "Alien" }, as_number),
            Err(MarshalError::Encoding {
                source: EncodeError::ForcedTypeMismatch { .. },
                ..
            })
        ));
    }

    #[test]
    fn mixed_number_sets_are_refused() {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Loose {
            Number(u8),
            Text(&'static str),
        }
        #[derive(Serialize)]
        struct Mixed {
            values: Vec<Loose>,
        }
        let record = Mixed {
            values: vec![Loose::Number(1), Loose::Text("two")],
        };
        assert!(matches!(
            marshal_with(&record, no_annotations),
            Err(MarshalError::Encoding {
                source: EncodeError::InvalidDataType(Kind::String),
                ..
            })
        ));
    }

    #[test]
    fn standalone_values() {
        assert_eq!(
            to_attribute_value(&0).unwrap(),
            Some(AttributeValue::N("0".into()))
        );
        assert_eq!(
            to_attribute_value(&false).unwrap(),
            Some(AttributeValue::N("0".into()))
        );
        assert_eq!(to_attribute_value(&None::<String>).unwrap(), None);
        assert_eq!(to_attribute_value(&Vec::<u8>::new()).unwrap(), None);
        assert_eq!(
            to_attribute_value(&["b", "a"]).unwrap(),
            Some(AttributeValue::Ss(vec!["b".into(), "a".into()]))
        );
        assert_eq!(
            to_attribute_value_as("42", AttributeType::N).unwrap(),
            Some(AttributeValue::N("42".into()))
        );
        assert!(to_attribute_value(&f64::NAN).is_err());
    }
}
