/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Response envelopes. Every member is optional on the wire, so every member defaults.

use crate::input::{KeysAndAttributes, WriteRequest};
use crate::model::{ConsumedCapacity, TableDescription};
use crate::AttributeSet;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesResponse {
    #[serde(default)]
    pub last_evaluated_table_name: Option<String>,
    #[serde(default)]
    pub table_names: Vec<String>,
}

/// CreateTable and DeleteTable answer with `TableDescription`, DescribeTable with `Table`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TableDescriptionWrapper {
    #[serde(rename = "TableDescription", default)]
    pub description: Option<TableDescription>,
    #[serde(rename = "Table", default)]
    pub table: Option<TableDescription>,
}

impl TableDescriptionWrapper {
    pub fn into_description(self) -> Option<TableDescription> {
        self.description.or(self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemResponse {
    #[serde(default)]
    pub item: Option<AttributeSet>,
    #[serde(default)]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Shared by UpdateItem and DeleteItem, which both echo attributes per `ReturnValues`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteItemResponse {
    #[serde(default)]
    pub attributes: Option<AttributeSet>,
    #[serde(default)]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

pub type UpdateItemResponse = WriteItemResponse;

/// Shared by Query and Scan.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub items: Vec<AttributeSet>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub scanned_count: Option<u64>,
    #[serde(default)]
    pub last_evaluated_key: Option<AttributeSet>,
    #[serde(default)]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Shared by BatchGetItem and BatchWriteItem.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchResponse {
    #[serde(default)]
    pub consumed_capacity: Vec<ConsumedCapacity>,
    #[serde(default)]
    pub responses: HashMap<String, Vec<AttributeSet>>,
    #[serde(default)]
    pub unprocessed_keys: HashMap<String, KeysAndAttributes>,
    #[serde(default)]
    pub unprocessed_items: HashMap<String, Vec<WriteRequest>>,
}
