/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Typed attribute values and the six wire categories they can take.

use crate::Blob;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// An item, key or exclusive start key: attribute name to attribute value.
pub type AttributeSet = HashMap<String, AttributeValue>;

/// One of the six attribute representations the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// String
    S,
    /// Number, carried as a decimal string
    N,
    /// Binary, carried as base64
    B,
    /// String set
    #[serde(rename = "SS")]
    Ss,
    /// Number set
    #[serde(rename = "NS")]
    Ns,
    /// Binary set
    #[serde(rename = "BS")]
    Bs,
}

impl AttributeType {
    /// All categories, scalars first.
    pub const ALL: [AttributeType; 6] = [
        AttributeType::S,
        AttributeType::N,
        AttributeType::B,
        AttributeType::Ss,
        AttributeType::Ns,
        AttributeType::Bs,
    ];

    /// The wire token for this category, e.g. `"SS"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::S => "S",
            AttributeType::N => "N",
            AttributeType::B => "B",
            AttributeType::Ss => "SS",
            AttributeType::Ns => "NS",
            AttributeType::Bs => "BS",
        }
    }

    /// Returns `true` for `SS`, `NS` and `BS`.
    pub fn is_set(&self) -> bool {
        matches!(
            self,
            AttributeType::Ss | AttributeType::Ns | AttributeType::Bs
        )
    }

    /// Returns `true` for the categories allowed in key schemas (`S`, `N`, `B`).
    pub fn is_scalar(&self) -> bool {
        !self.is_set()
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six attribute type tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttributeType(String);

impl fmt::Display for UnknownAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is an invalid attribute type", self.0)
    }
}

impl std::error::Error for UnknownAttributeType {}

impl FromStr for AttributeType {
    type Err = UnknownAttributeType;

    // Tokens are case-sensitive, as they are on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownAttributeType(s.to_string()))
    }
}

/// A single attribute value.
///
/// Exactly one category is populated by construction. Serialized externally tagged, so
/// `AttributeValue::Ss(vec!["a".into()])` is written as `{"SS":["a"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String
    S(String),
    /// Number in its canonical decimal form
    N(String),
    /// Binary
    B(Blob),
    /// String set
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// Number set
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// Binary set
    #[serde(rename = "BS")]
    Bs(Vec<Blob>),
}

impl AttributeValue {
    /// The category this value is written as.
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::S(_) => AttributeType::S,
            AttributeValue::N(_) => AttributeType::N,
            AttributeValue::B(_) => AttributeType::B,
            AttributeValue::Ss(_) => AttributeType::Ss,
            AttributeValue::Ns(_) => AttributeType::Ns,
            AttributeValue::Bs(_) => AttributeType::Bs,
        }
    }

    /// Returns `true` if the populated member is non-empty.
    ///
    /// The store refuses empty strings, empty binaries and empty sets, so an invalid value
    /// must never be sent.
    pub fn is_valid(&self) -> bool {
        match self {
            AttributeValue::S(s) | AttributeValue::N(s) => !s.is_empty(),
            AttributeValue::B(b) => !b.is_empty(),
            AttributeValue::Ss(set) | AttributeValue::Ns(set) => !set.is_empty(),
            AttributeValue::Bs(set) => !set.is_empty(),
        }
    }

    /// Returns the string payload if this is an `S` value.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number payload if this is an `N` value.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the binary payload if this is a `B` value.
    pub fn as_b(&self) -> Option<&Blob> {
        match self {
            AttributeValue::B(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the members if this is an `SS` value.
    pub fn as_ss(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Ss(set) => Some(set),
            _ => None,
        }
    }

    /// Returns the members if this is an `NS` value.
    pub fn as_ns(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Ns(set) => Some(set),
            _ => None,
        }
    }

    /// Returns the members if this is a `BS` value.
    pub fn as_bs(&self) -> Option<&[Blob]> {
        match self {
            AttributeValue::Bs(set) => Some(set),
            _ => None,
        }
    }
}
