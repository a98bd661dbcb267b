/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Request construction and response parsing for the JSON 1.0 protocol.

use crate::config::Config;
use crate::error::{Error, ServiceError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dynamo_types::REQUEST_SIZE_LIMIT_BYTES;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::debug;

const API_VERSION: &str = "DynamoDB_20120810";
const CONTENT_TYPE_JSON: &str = "application/x-amz-json-1.0";

pub const X_AMZ_TARGET: &str = "x-amz-target";
pub const X_AMZ_DATE: &str = "x-amz-date";

/// The RPC targets the client calls.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    ListTables,
    CreateTable,
    DescribeTable,
    UpdateTable,
    DeleteTable,
    PutItem,
    GetItem,
    UpdateItem,
    DeleteItem,
    BatchGetItem,
    BatchWriteItem,
    Query,
    Scan,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::ListTables => "ListTables",
            Target::CreateTable => "CreateTable",
            Target::DescribeTable => "DescribeTable",
            Target::UpdateTable => "UpdateTable",
            Target::DeleteTable => "DeleteTable",
            Target::PutItem => "PutItem",
            Target::GetItem => "GetItem",
            Target::UpdateItem => "UpdateItem",
            Target::DeleteItem => "DeleteItem",
            Target::BatchGetItem => "BatchGetItem",
            Target::BatchWriteItem => "BatchWriteItem",
            Target::Query => "Query",
            Target::Scan => "Scan",
        }
    }

    /// Value of the `X-Amz-Target` header, e.g. `DynamoDB_20120810.PutItem`.
    pub fn header_value(&self) -> String {
        format!("{}.{}", API_VERSION, self.as_str())
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the POST carrying `input` to `target`.
pub(crate) fn build_request<I: Serialize + ?Sized>(
    config: &Config,
    target: Target,
    input: &I,
    now: DateTime<Utc>,
) -> Result<http::Request<Bytes>, Error> {
    let body = serde_json::to_vec(input).map_err(|err| Error::Construction(err.into()))?;
    if body.len() > REQUEST_SIZE_LIMIT_BYTES {
        return Err(Error::RequestTooLarge {
            size: body.len(),
            limit: REQUEST_SIZE_LIMIT_BYTES,
        });
    }
    debug!(operation = %target, size = body.len(), "request built");
    http::Request::builder()
        .method(Method::POST)
        .uri(config.endpoint().clone())
        .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
        .header(X_AMZ_TARGET, target.header_value())
        .header(X_AMZ_DATE, now.format("%Y%m%dT%H%M%SZ").to_string())
        .body(Bytes::from(body))
        .map_err(|err| Error::Construction(err.into()))
}

/// Decodes a 200 response into `O`; any other status becomes a [`ServiceError`].
pub(crate) fn parse_response<O: DeserializeOwned>(
    response: http::Response<Bytes>,
) -> Result<O, Error> {
    let status = response.status();
    debug!(status = status.as_u16(), size = response.body().len(), "response received");
    if status != StatusCode::OK {
        return Err(ServiceError::from_response(status.as_u16(), response.body()).into());
    }
    serde_json::from_slice(response.body()).map_err(|err| Error::Response(err.into()))
}

#[cfg(test)]
mod test {
    use super::{build_request, parse_response, Target, X_AMZ_DATE, X_AMZ_TARGET};
    use crate::config::Config;
    use crate::error::Error;
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use dynamo_types::input::ListTablesRequest;
    use dynamo_types::output::ListTablesResponse;
    use http::header::CONTENT_TYPE;
    use std::collections::HashMap;

    fn config() -> Config {
        Config::builder()
            .endpoint("http://localhost:8000".parse().unwrap())
            .build()
    }

    #[test]
    fn headers_and_body() {
        let now = Utc.timestamp_opt(1369407845, 0).unwrap();
        let request = build_request(
            &config(),
            Target::ListTables,
            &ListTablesRequest {
                limit: Some(10),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(request.method(), http::Method::POST);
        assert_eq!(request.uri().to_string(), "http://localhost:8000/");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/x-amz-json-1.0");
        assert_eq!(request.headers()[X_AMZ_TARGET], "DynamoDB_20120810.ListTables");
        assert_eq!(request.headers()[X_AMZ_DATE], "20130524T150405Z");
        assert_eq!(request.body().as_ref(), br#"{"Limit":10}"#);
    }

    #[test]
    fn oversized_bodies_are_refused() {
        let mut input = HashMap::new();
        input.insert("Blob", "x".repeat(1_000_000));
        match build_request(&config(), Target::PutItem, &input, Utc::now()) {
            Err(Error::RequestTooLarge { size, limit }) => {
                assert_eq!(limit, 1_000_000);
                assert!(size > limit);
            }
            other => panic!("expected an oversized request error, got {:?}", other),
        }
    }

    #[test]
    fn every_target_is_versioned() {
        for target in [Target::Query, Target::BatchWriteItem, Target::UpdateTable] {
            assert_eq!(
                target.header_value(),
                format!("DynamoDB_20120810.{}", target)
            );
        }
    }

    #[test]
    fn non_200_is_a_service_error() {
        let response = http::Response::builder()
            .status(400)
            .body(Bytes::from_static(
                br#"{"__type":"com.amazonaws.dynamodb.v20120810#ProvisionedThroughputExceededException","message":"slow down"}"#,
            ))
            .unwrap();
        match parse_response::<ListTablesResponse>(response) {
            Err(Error::Service(err)) => {
                assert!(err.is_throttling());
                assert_eq!(err.message(), "slow down");
            }
            other => panic!("expected a service error, got {:?}", other),
        }
    }

    #[test]
    fn ok_bodies_decode() {
        let response = http::Response::builder()
            .status(200)
            .body(Bytes::from_static(br#"{"TableNames":["movies"]}"#))
            .unwrap();
        let output: ListTablesResponse = parse_response(response).unwrap();
        assert_eq!(output.table_names, vec!["movies".to_string()]);

        let garbage = http::Response::builder()
            .status(200)
            .body(Bytes::from_static(b"<html>"))
            .unwrap();
        assert!(matches!(
            parse_response::<ListTablesResponse>(garbage),
            Err(Error::Response(_))
        ));
    }
}
