/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Field annotations.
//!
//! An annotation is a comma separated list. The first segment renames the attribute (empty
//! keeps the field name); the remaining segments are flags:
//!
//! | flag                            | effect                                   |
//! |---------------------------------|------------------------------------------|
//! | `omitempty`                     | the field is skipped when empty          |
//! | `S`, `N`, `B`, `SS`, `NS`, `BS` | the attribute is forced to that category |
//!
//! An annotation of exactly `-` excludes the field. Flags are case-sensitive and unknown flags
//! are ignored.

use dynamo_types::AttributeType;

const IGNORE: &str = "-";
const OMIT_EMPTY: &str = "omitempty";

/// How one record field is turned into an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Attribute name written to the wire.
    pub wire_name: String,
    /// Category the value must be encoded as, instead of the inferred one.
    pub forced_type: Option<AttributeType>,
    /// The field is excluded entirely.
    pub omitted: bool,
    /// The field was annotated `omitempty`.
    pub omit_if_empty: bool,
}

impl FieldMetadata {
    fn named(field: &str) -> Self {
        FieldMetadata {
            wire_name: field.to_string(),
            forced_type: None,
            omitted: false,
            omit_if_empty: false,
        }
    }
}

/// Resolves the metadata of the field declared as `field`, given its annotation if any.
///
/// ```
/// use dynamo_marshal::tag::resolve;
/// use dynamo_types::AttributeType;
///
/// let meta = resolve("year", Some("Year,N,omitempty"));
/// assert_eq!(meta.wire_name, "Year");
/// assert_eq!(meta.forced_type, Some(AttributeType::N));
/// assert!(meta.omit_if_empty);
///
/// assert!(resolve("secret", Some("-")).omitted);
/// ```
pub fn resolve(field: &str, annotation: Option<&str>) -> FieldMetadata {
    let mut meta = FieldMetadata::named(field);
    let annotation = match annotation {
        Some(annotation) if !annotation.is_empty() => annotation,
        _ => return meta,
    };
    if annotation == IGNORE {
        meta.omitted = true;
        return meta;
    }

    let mut segments = annotation.split(',');
    if let Some(name) = segments.next().filter(|name| !name.is_empty()) {
        meta.wire_name = name.to_string();
    }
    for flag in segments {
        if flag == OMIT_EMPTY {
            meta.omit_if_empty = true;
        } else if let Ok(forced) = flag.parse::<AttributeType>() {
            meta.forced_type = Some(forced);
        }
    }
    meta
}
