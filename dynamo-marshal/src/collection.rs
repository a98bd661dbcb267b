/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::EncodeError;
use crate::value::Value;
use dynamo_types::Blob;
use std::collections::HashSet;
use std::hash::Hash;

/// A member of an encoded set.
pub(crate) trait Member: Clone + Eq + Hash {
    fn is_blank(&self) -> bool;
}

impl Member for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Member for Blob {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Encodes every element of a sequence with `encode`.
///
/// Elements that encode to nothing are dropped, as are repeats of an earlier element; the
/// store rejects both. Order is otherwise preserved.
pub(crate) fn encode_collection<M, F>(items: &[Value], mut encode: F) -> Result<Vec<M>, EncodeError>
where
    M: Member,
    F: FnMut(&Value) -> Result<M, EncodeError>,
{
    let mut seen = HashSet::with_capacity(items.len());
    let mut members = Vec::with_capacity(items.len());
    for item in items {
        let member = encode(item)?;
        if member.is_blank() || !seen.insert(member.clone()) {
            continue;
        }
        members.push(member);
    }
    Ok(members)
}
