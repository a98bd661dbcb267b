/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::value::Kind;
use dynamo_types::AttributeType;
use std::fmt::Display;
use thiserror::Error;

/// Failure to turn one value into an attribute.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The value has no representation in any wire category.
    #[error("invalid data type {0}")]
    InvalidDataType(Kind),

    /// NaN and the infinities have no decimal representation.
    #[error("number {0} cannot be stored")]
    NonFiniteNumber(f64),

    /// A composite value could not be written as a JSON string.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// The field's annotation forces a category its value cannot take.
    #[error("value of kind {found} cannot be stored as {forced}")]
    ForcedTypeMismatch { forced: AttributeType, found: Kind },

    /// Raised by the value's own `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

/// Failure to marshal a whole record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MarshalError {
    /// Only structs, or optional references to structs, can be marshaled.
    #[error("type was not struct or ptr to struct, was {0}")]
    NotAStruct(Kind),

    /// The record was an absent optional.
    #[error("type was not struct or ptr to struct, was a null reference")]
    NullRecord,

    /// Two fields resolved to the same attribute name.
    #[error("multiple attributes have same designated name `{0}`")]
    DuplicateName(String),

    /// One field could not be encoded.
    #[error("field `{field}` could not be encoded")]
    Encoding {
        field: String,
        #[source]
        source: EncodeError,
    },

    /// The record's own `Serialize` implementation failed outside any field.
    #[error("record could not be serialized: {0}")]
    Serialize(String),

    /// A batch holds more requests than the service accepts in one call.
    #[error("maximum of {limit} item limit for batch writes exceeded (got {found})")]
    TooManyItems { limit: usize, found: usize },
}

impl serde::ser::Error for MarshalError {
    fn custom<T: Display>(msg: T) -> Self {
        MarshalError::Serialize(msg.to_string())
    }
}
