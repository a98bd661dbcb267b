/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Request envelopes, one per RPC target.
//!
//! Unset optional members are left out of the JSON body entirely; the service treats an
//! explicit `null` or empty collection differently from an absent member.

use crate::model::{
    AttributeAction, AttributeDefinition, Condition, KeySchemaElement, LocalSecondaryIndex,
    ProvisionedThroughput, ReturnConsumedCapacity, ReturnItemCollectionMetrics, ReturnValues,
    Select,
};
use crate::{AttributeSet, AttributeValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Body of CreateTable, UpdateTable, DescribeTable and DeleteTable.
///
/// Describe and delete only carry the table name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableRequest {
    pub table_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

impl TableRequest {
    pub fn named(table_name: impl Into<String>) -> Self {
        TableRequest {
            table_name: table_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemRequest {
    pub table_name: String,
    pub item: AttributeSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl PutItemRequest {
    pub fn new(table_name: impl Into<String>, item: AttributeSet) -> Self {
        PutItemRequest {
            table_name: table_name.into(),
            item,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemRequest {
    pub table_name: String,
    pub key: AttributeSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes_to_get: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub consistent_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl GetItemRequest {
    pub fn new(table_name: impl Into<String>, key: AttributeSet) -> Self {
        GetItemRequest {
            table_name: table_name.into(),
            key,
            ..Default::default()
        }
    }
}

/// A new value for one attribute, and what to do with it.
///
/// `Delete` without a value removes the attribute; `Delete` with a set value removes those
/// members from the stored set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    pub action: AttributeAction,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemRequest {
    pub table_name: String,
    pub key: AttributeSet,
    pub attribute_updates: HashMap<String, AttributeUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemRequest {
    pub table_name: String,
    pub key: AttributeSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl DeleteItemRequest {
    pub fn new(table_name: impl Into<String>, key: AttributeSet) -> Self {
        DeleteItemRequest {
            table_name: table_name.into(),
            key,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes_to_get: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "is_false")]
    pub consistent_read: bool,
    pub key_conditions: HashMap<String, Condition>,
    /// `Some(false)` walks the index in descending order; absent means ascending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<AttributeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanRequest {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes_to_get: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub scan_filter: HashMap<String, Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<AttributeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub item: AttributeSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    pub key: AttributeSet,
}

/// One entry of a batch write: either a put or a delete, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteRequest {
    #[serde(rename = "PutRequest")]
    Put(PutRequest),
    #[serde(rename = "DeleteRequest")]
    Delete(DeleteRequest),
}

impl WriteRequest {
    pub fn put(item: AttributeSet) -> Self {
        WriteRequest::Put(PutRequest { item })
    }

    pub fn delete(key: AttributeSet) -> Self {
        WriteRequest::Delete(DeleteRequest { key })
    }
}

/// Body of BatchWriteItem: table name to the writes aimed at that table.
///
/// The service accepts at most [`BATCH_WRITE_ITEM_LIMIT`](crate::BATCH_WRITE_ITEM_LIMIT)
/// writes per call across all tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemRequest {
    pub request_items: HashMap<String, Vec<WriteRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}

impl BatchWriteItemRequest {
    /// Number of writes across every table.
    pub fn len(&self) -> usize {
        self.request_items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keys to read from one table in a BatchGetItem, plus optional projection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    pub keys: Vec<AttributeSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes_to_get: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub consistent_read: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemRequest {
    pub request_items: HashMap<String, KeysAndAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}
