/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Marshals application records into DynamoDB attribute sets.
//!
//! Any type implementing `serde::Serialize` as a struct can be marshaled. The attribute
//! category of each field is inferred from its value: numbers and booleans become `N`, text
//! becomes `S`, byte strings become `B`, and sequences become `SS`, `NS` or `BS` after their
//! first element. Composite values with no native category are stored as JSON text.
//!
//! Field annotations rename attributes, force a category, or exclude fields. They are declared
//! with [`dynamo_item!`]:
//!
//! ```
//! use dynamo_marshal::{dynamo_item, marshal};
//! use dynamo_types::AttributeValue;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Movie {
//!     title: String,
//!     year: u16,
//!     genres: Vec<String>,
//!     rating: Option<f32>,
//!     notes: String,
//! }
//!
//! dynamo_item!(Movie {
//!     title: "Title",
//!     year: "Year,omitempty",
//!     genres: "Genres,SS",
//!     notes: "-",
//! });
//!
//! let movie = Movie {
//!     title: "Alien".into(),
//!     year: 1979,
//!     genres: vec!["horror".into(), "".into(), "sci-fi".into()],
//!     rating: None,
//!     notes: "not stored".into(),
//! };
//! let item = marshal(&movie)?;
//! assert_eq!(item["Title"], AttributeValue::S("Alien".into()));
//! assert_eq!(item["Year"], AttributeValue::N("1979".into()));
//! assert_eq!(
//!     item["Genres"],
//!     AttributeValue::Ss(vec!["horror".into(), "sci-fi".into()])
//! );
//! assert_eq!(item.len(), 3);
//! # Ok::<(), dynamo_marshal::MarshalError>(())
//! ```

mod batch;
mod collection;
mod error;
mod infer;
mod marshal;
mod record;
mod scalar;
pub mod tag;
mod value;

pub use batch::{batch_put, BatchWriteBuilder};
pub use error::{EncodeError, MarshalError};
pub use marshal::{marshal, marshal_with, to_attribute_value, to_attribute_value_as};
pub use scalar::format_number;
pub use value::Kind;

use serde::Serialize;

/// Looks up the annotation of a field by its serialized name.
pub type Annotations = fn(&str) -> Option<&'static str>;

/// A record that can be stored as an item.
///
/// Implement it with [`dynamo_item!`], or by hand when the annotations are computed.
pub trait Item: Serialize {
    /// Annotation of the field serialized as `field`, e.g. `"Title,omitempty"`.
    ///
    /// See [`tag`] for the annotation grammar.
    fn annotation(field: &str) -> Option<&'static str> {
        let _ = field;
        None
    }
}

impl<'a, T: Item + ?Sized> Item for &'a T {
    fn annotation(field: &str) -> Option<&'static str> {
        T::annotation(field)
    }
}

impl<T: Item + ?Sized> Item for Box<T> {
    fn annotation(field: &str) -> Option<&'static str> {
        T::annotation(field)
    }
}

impl<T: Item> Item for Option<T> {
    fn annotation(field: &str) -> Option<&'static str> {
        T::annotation(field)
    }
}

/// Implements [`Item`] for a type, with optional per-field annotations.
///
/// Fields are named as serde serializes them, so a `#[serde(rename = "..")]` applies before
/// the annotation is looked up.
///
/// ```
/// use dynamo_marshal::dynamo_item;
/// # #[derive(serde::Serialize)] struct Plain { a: u8 }
/// # #[derive(serde::Serialize)] struct Session { id: String, expires: u64, token: String }
///
/// dynamo_item!(Plain);
/// dynamo_item!(Session {
///     id: "SessionId",
///     expires: "Expires,N,omitempty",
///     token: "-",
/// });
/// ```
#[macro_export]
macro_rules! dynamo_item {
    ($ty:ty { $($field:ident : $annotation:literal),* $(,)? }) => {
        impl $crate::Item for $ty {
            fn annotation(field: &str) -> ::core::option::Option<&'static str> {
                $(
                    if field == ::core::stringify!($field) {
                        return ::core::option::Option::Some($annotation);
                    }
                )*
                let _ = field;
                ::core::option::Option::None
            }
        }
    };
    ($ty:ty) => {
        impl $crate::Item for $ty {}
    };
}
