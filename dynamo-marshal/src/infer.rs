/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Chooses the attribute category of a value that carries no forced type.

use crate::error::EncodeError;
use crate::value::{Kind, Value};
use dynamo_types::AttributeType;

/// Category of a non-sequence value.
///
/// Composites without a native category are stored as JSON text.
fn scalar_category(kind: Kind) -> AttributeType {
    match kind {
        Kind::Bool | Kind::Signed | Kind::Unsigned | Kind::Float => AttributeType::N,
        Kind::Bytes => AttributeType::B,
        Kind::Null
        | Kind::Optional
        | Kind::Unit
        | Kind::Char
        | Kind::String
        | Kind::Map
        | Kind::Struct
        | Kind::Variant => AttributeType::S,
        Kind::Seq => unreachable!("sequences are categorised by their elements"),
    }
}

/// Category of a sequence, from the kind of its first element.
fn set_category(element: Kind) -> Option<AttributeType> {
    match element {
        Kind::Signed | Kind::Unsigned | Kind::Float => Some(AttributeType::Ns),
        Kind::Bytes => Some(AttributeType::Bs),
        Kind::Null | Kind::Char | Kind::String | Kind::Map | Kind::Struct | Kind::Variant => {
            Some(AttributeType::Ss)
        }
        Kind::Bool | Kind::Optional | Kind::Unit | Kind::Seq => None,
    }
}

/// Returns the category `value` is encoded as, or `None` when there is nothing to encode.
///
/// One level of `Some` is looked through, both on the value and on a sequence's first element.
pub(crate) fn infer(value: &Value) -> Result<Option<AttributeType>, EncodeError> {
    match value.deref_once() {
        Value::Null => Ok(None),
        Value::Seq(items) => match items.first() {
            None => Ok(None),
            Some(first) => {
                let element = first.deref_once().kind();
                set_category(element)
                    .map(Some)
                    .ok_or(EncodeError::InvalidDataType(element))
            }
        },
        other => Ok(Some(scalar_category(other.kind()))),
    }
}
