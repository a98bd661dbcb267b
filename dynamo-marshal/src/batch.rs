/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! BatchWriteItem envelopes.

use crate::error::MarshalError;
use crate::{marshal, Item};
use dynamo_types::input::{BatchWriteItemRequest, WriteRequest};
use dynamo_types::{AttributeSet, BATCH_WRITE_ITEM_LIMIT};
use std::collections::HashMap;
use tracing::debug;

/// Accumulates puts and deletes, across any number of tables, into one batch write.
///
/// The service takes at most 25 writes per call; adding a 26th is refused before the record is
/// marshaled.
///
/// ```
/// use dynamo_marshal::{dynamo_item, BatchWriteBuilder};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Key {
///     id: u32,
/// }
/// dynamo_item!(Key);
///
/// let request = BatchWriteBuilder::new()
///     .put("movies", &Key { id: 1 })?
///     .delete("movies", &Key { id: 2 })?
///     .build();
/// assert_eq!(request.len(), 2);
/// # Ok::<(), dynamo_marshal::MarshalError>(())
/// ```
#[derive(Debug, Default)]
pub struct BatchWriteBuilder {
    request_items: HashMap<String, Vec<WriteRequest>>,
    len: usize,
}

impl BatchWriteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a put of `item` into `table`.
    pub fn put<T: Item + ?Sized>(
        self,
        table: impl Into<String>,
        item: &T,
    ) -> Result<Self, MarshalError> {
        self.push(table.into(), WriteRequest::put, item)
    }

    /// Adds a delete of the item with primary key `key` from `table`.
    pub fn delete<K: Item + ?Sized>(
        self,
        table: impl Into<String>,
        key: &K,
    ) -> Result<Self, MarshalError> {
        self.push(table.into(), WriteRequest::delete, key)
    }

    fn push<T: Item + ?Sized>(
        mut self,
        table: String,
        wrap: fn(AttributeSet) -> WriteRequest,
        record: &T,
    ) -> Result<Self, MarshalError> {
        if self.len >= BATCH_WRITE_ITEM_LIMIT {
            return Err(MarshalError::TooManyItems {
                limit: BATCH_WRITE_ITEM_LIMIT,
                found: self.len + 1,
            });
        }
        let attributes = marshal(record)?;
        self.request_items
            .entry(table)
            .or_default()
            .push(wrap(attributes));
        self.len += 1;
        Ok(self)
    }

    /// Number of writes added so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn build(self) -> BatchWriteItemRequest {
        debug!(writes = self.len, tables = self.request_items.len(), "batch write built");
        BatchWriteItemRequest {
            request_items: self.request_items,
            ..Default::default()
        }
    }
}

/// Builds a batch write putting every one of `items` into `table`.
///
/// More than 25 items are refused before any of them is marshaled.
pub fn batch_put<T: Item>(table: &str, items: &[T]) -> Result<BatchWriteItemRequest, MarshalError> {
    if items.len() > BATCH_WRITE_ITEM_LIMIT {
        return Err(MarshalError::TooManyItems {
            limit: BATCH_WRITE_ITEM_LIMIT,
            found: items.len(),
        });
    }
    items
        .iter()
        .try_fold(BatchWriteBuilder::new(), |batch, item| batch.put(table, item))
        .map(BatchWriteBuilder::build)
}
