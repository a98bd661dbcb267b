/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Shapes shared between requests and responses.

use crate::{AttributeType, AttributeValue};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Operators accepted in key conditions (Query) and scan filters (Scan).
///
/// `Eq` through `Between` are valid for Query; Scan additionally accepts the remaining ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    BeginsWith,
    Between,
    Contains,
    NotContains,
    /// Attribute exists
    NotNull,
    /// Attribute does not exist
    Null,
    In,
}

/// Which attributes a Query or Scan returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Select {
    AllAttributes,
    AllProjectedAttributes,
    SpecificAttributes,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnConsumedCapacity {
    Total,
    Indexes,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValues {
    None,
    AllOld,
    UpdatedOld,
    AllNew,
    UpdatedNew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnItemCollectionMetrics {
    Size,
    None,
}

/// Role of an attribute in a table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    Hash,
    Range,
}

/// What an UpdateItem does with the supplied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeAction {
    Put,
    Delete,
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionType {
    All,
    KeysOnly,
    Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Creating,
    Updating,
    Deleting,
    Active,
    #[serde(other)]
    Unknown,
}

/// A comparison against one or more attribute values, used by Query and Scan.
///
/// Conditions are passed through as built by the caller; no expression compilation happens
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
    pub comparison_operator: ComparisonOperator,
}

impl Condition {
    pub fn new(comparison_operator: ComparisonOperator, values: Vec<AttributeValue>) -> Self {
        Condition {
            attribute_value_list: values,
            comparison_operator,
        }
    }

    /// `attribute = value`
    pub fn eq(value: AttributeValue) -> Self {
        Condition::new(ComparisonOperator::Eq, vec![value])
    }

    /// `low <= attribute <= high`
    pub fn between(low: AttributeValue, high: AttributeValue) -> Self {
        Condition::new(ComparisonOperator::Between, vec![low, high])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(rename = "AttributeName")]
    pub name: String,
    #[serde(rename = "AttributeType")]
    pub attribute_type: AttributeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchemaElement {
    #[serde(rename = "AttributeName")]
    pub name: String,
    #[serde(rename = "KeyType")]
    pub key_type: KeyType,
}

impl KeySchemaElement {
    pub fn hash(name: impl Into<String>) -> Self {
        KeySchemaElement {
            name: name.into(),
            key_type: KeyType::Hash,
        }
    }

    pub fn range(name: impl Into<String>) -> Self {
        KeySchemaElement {
            name: name.into(),
            key_type: KeyType::Range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
    pub projection_type: ProjectionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

/// Read and write capacity of a table.
///
/// The timestamps and decrease counter are only ever returned by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    pub read_capacity_units: u64,
    pub write_capacity_units: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_decrease_date_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_increase_date_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_decreases_today: Option<u64>,
}

impl ProvisionedThroughput {
    pub fn new(read_capacity_units: u64, write_capacity_units: u64) -> Self {
        ProvisionedThroughput {
            read_capacity_units,
            write_capacity_units,
            ..Default::default()
        }
    }
}

/// Capacity consumed by a single operation on a single table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub capacity_units: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    #[serde(default)]
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Unix seconds, sent by the service in scientific notation (e.g. `1.3E9`).
    #[serde(default)]
    pub creation_date_time: Option<f64>,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default)]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(default)]
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
    #[serde(default)]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub table_size_bytes: i64,
    #[serde(default)]
    pub table_status: Option<TableStatus>,
}

impl TableDescription {
    /// The table creation time, if the service reported one.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let seconds = self.creation_date_time?;
        let whole = seconds.trunc();
        let nanos = ((seconds - whole) * 1e9).round() as u32;
        Utc.timestamp_opt(whole as i64, nanos).single()
    }
}
