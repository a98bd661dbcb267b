/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::Config;
use crate::error::{BoxError, Error};
use crate::operation::{build_request, parse_response, Target};
use bytes::Bytes;
use chrono::Utc;
use dynamo_marshal::{batch_put, marshal, Item};
use dynamo_types::input::{
    AttributeUpdate, BatchGetItemRequest, BatchWriteItemRequest, DeleteItemRequest,
    GetItemRequest, KeysAndAttributes, ListTablesRequest, PutItemRequest, QueryRequest,
    ScanRequest, TableRequest, UpdateItemRequest,
};
use dynamo_types::model::{
    AttributeAction, AttributeDefinition, KeySchemaElement, ProvisionedThroughput,
    TableDescription,
};
use dynamo_types::output::{
    BatchResponse, GetItemResponse, ListTablesResponse, QueryResponse, TableDescriptionWrapper,
    WriteItemResponse,
};
use dynamo_types::{
    AttributeSet, BATCH_GET_ITEM_LIMIT, BATCH_WRITE_ITEM_LIMIT, MAX_TABLE_NAME_LEN,
    MIN_TABLE_NAME_LEN,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tower::{Service, ServiceExt};
use tracing::{debug, debug_span, Instrument};

/// A key attribute takes part in either the hash key or the range key.
const MAX_KEY_ATTRIBUTES: usize = 2;

/// DynamoDB client, sending requests through the connector `C`.
///
/// The connector is any `tower::Service` exchanging `http` requests and responses with `Bytes`
/// bodies. Credentials are not handled here: wrap the connector in a signing layer before
/// handing it to the client.
#[derive(Debug, Clone)]
pub struct Client<C> {
    config: Config,
    connector: C,
}

impl<C> Client<C> {
    pub fn new(config: Config, connector: C) -> Self {
        Client { config, connector }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<C> Client<C>
where
    C: Service<http::Request<Bytes>, Response = http::Response<Bytes>> + Clone,
    C::Error: Into<BoxError>,
{
    /// Sends `input` to `target` and decodes the response as `O`.
    ///
    /// The typed operations below are built on this; it is public for requests they do not
    /// cover.
    pub async fn send<I, O>(&self, target: Target, input: &I) -> Result<O, Error>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let span = debug_span!("dynamodb", operation = %target);
        async {
            let request = build_request(&self.config, target, input, Utc::now())?;
            let response = self
                .connector
                .clone()
                .oneshot(request)
                .await
                .map_err(|err| Error::Dispatch(err.into()))?;
            parse_response(response)
        }
        .instrument(span)
        .await
    }

    /// Stores `item` in `table`, replacing any item with the same key.
    pub async fn put_item<T: Item + ?Sized>(
        &self,
        table: &str,
        item: &T,
    ) -> Result<WriteItemResponse, Error> {
        let request = PutItemRequest::new(table, marshal(item)?);
        self.send(Target::PutItem, &request).await
    }

    /// Fetches the item with primary key `key`, as raw attributes.
    pub async fn get_item_raw<K: Item + ?Sized>(
        &self,
        table: &str,
        key: &K,
    ) -> Result<GetItemResponse, Error> {
        let request = GetItemRequest::new(table, marshal(key)?);
        self.send(Target::GetItem, &request).await
    }

    /// Applies `action` to every attribute of `updates` on the item with primary key `key`.
    ///
    /// `key` must marshal to the hash key and, optionally, the range key. Attributes of
    /// `updates` that are part of the key are left out, since key attributes cannot change.
    pub async fn update_item<K, U>(
        &self,
        table: &str,
        key: &K,
        updates: &U,
        action: AttributeAction,
    ) -> Result<WriteItemResponse, Error>
    where
        K: Item + ?Sized,
        U: Item + ?Sized,
    {
        let key = marshal(key)?;
        if key.len() > MAX_KEY_ATTRIBUTES {
            return Err(Error::InvalidInput(format!(
                "key has {} attributes, it should only contain the hash key and range key",
                key.len()
            )));
        }
        let attribute_updates: HashMap<_, _> = marshal(updates)?
            .into_iter()
            .filter(|(name, _)| !key.contains_key(name))
            .map(|(name, value)| {
                (
                    name,
                    AttributeUpdate {
                        value: Some(value),
                        action,
                    },
                )
            })
            .collect();
        let request = UpdateItemRequest {
            table_name: table.to_string(),
            key,
            attribute_updates,
            ..Default::default()
        };
        self.send(Target::UpdateItem, &request).await
    }

    pub async fn delete_item<K: Item + ?Sized>(
        &self,
        table: &str,
        key: &K,
    ) -> Result<WriteItemResponse, Error> {
        let request = DeleteItemRequest::new(table, marshal(key)?);
        self.send(Target::DeleteItem, &request).await
    }

    /// Puts up to 25 items into `table` in a single call.
    ///
    /// Writes the service could not process are returned in
    /// [`BatchResponse::unprocessed_items`] for the caller to retry.
    pub async fn batch_write<T: Item>(
        &self,
        table: &str,
        items: &[T],
    ) -> Result<BatchResponse, Error> {
        let request = batch_put(table, items)?;
        self.batch_write_request(&request).await
    }

    /// Sends a batch of puts and deletes built with
    /// [`BatchWriteBuilder`](dynamo_marshal::BatchWriteBuilder).
    pub async fn batch_write_request(
        &self,
        request: &BatchWriteItemRequest,
    ) -> Result<BatchResponse, Error> {
        if request.len() > BATCH_WRITE_ITEM_LIMIT {
            return Err(Error::InvalidInput(format!(
                "maximum of {} item limit for batch writes exceeded ({} requested)",
                BATCH_WRITE_ITEM_LIMIT,
                request.len()
            )));
        }
        self.send(Target::BatchWriteItem, request).await
    }

    /// Fetches up to 100 items of `table` by key, keeping only `attributes_to_get` when it is
    /// not empty.
    pub async fn batch_get_raw(
        &self,
        table: &str,
        keys: Vec<AttributeSet>,
        attributes_to_get: Vec<String>,
    ) -> Result<BatchResponse, Error> {
        if keys.len() > BATCH_GET_ITEM_LIMIT {
            return Err(Error::InvalidInput(format!(
                "maximum of {} keys for batch gets exceeded ({} requested)",
                BATCH_GET_ITEM_LIMIT,
                keys.len()
            )));
        }
        let mut request_items = HashMap::new();
        request_items.insert(
            table.to_string(),
            KeysAndAttributes {
                keys,
                attributes_to_get,
                consistent_read: false,
            },
        );
        let request = BatchGetItemRequest {
            request_items,
            ..Default::default()
        };
        self.send(Target::BatchGetItem, &request).await
    }

    pub async fn query_raw(&self, request: &QueryRequest) -> Result<QueryResponse, Error> {
        self.send(Target::Query, request).await
    }

    pub async fn scan_raw(&self, request: &ScanRequest) -> Result<QueryResponse, Error> {
        self.send(Target::Scan, request).await
    }

    /// Lists table names, at most `limit` of them, starting after `exclusive_start_table_name`.
    pub async fn list_tables(
        &self,
        exclusive_start_table_name: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ListTablesResponse, Error> {
        let request = ListTablesRequest {
            exclusive_start_table_name: exclusive_start_table_name.map(str::to_string),
            limit,
        };
        self.send(Target::ListTables, &request).await
    }

    /// Creates a table keyed on `hash_key` and, optionally, `range_key`.
    pub async fn create_table_simple(
        &self,
        table: &str,
        hash_key: AttributeDefinition,
        range_key: Option<AttributeDefinition>,
        throughput: ProvisionedThroughput,
    ) -> Result<TableDescription, Error> {
        validate_table_name(table)?;
        validate_throughput(&throughput)?;
        let mut key_schema = vec![KeySchemaElement::hash(hash_key.name.clone())];
        let mut attribute_definitions = vec![hash_key];
        if let Some(range_key) = range_key {
            key_schema.push(KeySchemaElement::range(range_key.name.clone()));
            attribute_definitions.push(range_key);
        }
        if let Some(invalid) = attribute_definitions
            .iter()
            .find(|definition| !definition.attribute_type.is_scalar())
        {
            return Err(Error::InvalidInput(format!(
                "key attribute {} has type {}, only S, N and B can be keys",
                invalid.name, invalid.attribute_type
            )));
        }
        let request = TableRequest {
            attribute_definitions,
            key_schema,
            provisioned_throughput: Some(throughput),
            ..TableRequest::named(table)
        };
        self.table_operation(Target::CreateTable, &request).await
    }

    pub async fn describe_table(&self, table: &str) -> Result<TableDescription, Error> {
        self.table_operation(Target::DescribeTable, &TableRequest::named(table))
            .await
    }

    pub async fn delete_table(&self, table: &str) -> Result<TableDescription, Error> {
        self.table_operation(Target::DeleteTable, &TableRequest::named(table))
            .await
    }

    /// Sets the provisioned read and write capacity of `table`.
    pub async fn change_throughput(
        &self,
        table: &str,
        read_capacity_units: u64,
        write_capacity_units: u64,
    ) -> Result<TableDescription, Error> {
        let throughput = ProvisionedThroughput::new(read_capacity_units, write_capacity_units);
        validate_throughput(&throughput)?;
        let request = TableRequest {
            provisioned_throughput: Some(throughput),
            ..TableRequest::named(table)
        };
        self.table_operation(Target::UpdateTable, &request).await
    }

    async fn table_operation(
        &self,
        target: Target,
        request: &TableRequest,
    ) -> Result<TableDescription, Error> {
        let wrapper: TableDescriptionWrapper = self.send(target, request).await?;
        let description = wrapper.into_description().ok_or_else(|| {
            Error::Response(format!("{} response carried no table description", target).into())
        })?;
        debug!(table = %description.table_name, status = ?description.table_status, "table described");
        Ok(description)
    }
}

fn validate_table_name(table: &str) -> Result<(), Error> {
    if (MIN_TABLE_NAME_LEN..=MAX_TABLE_NAME_LEN).contains(&table.len()) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "table name must be between {} and {} characters, got {}",
            MIN_TABLE_NAME_LEN,
            MAX_TABLE_NAME_LEN,
            table.len()
        )))
    }
}

fn validate_throughput(throughput: &ProvisionedThroughput) -> Result<(), Error> {
    if throughput.read_capacity_units == 0 || throughput.write_capacity_units == 0 {
        return Err(Error::InvalidInput(
            "read and write capacity units must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
