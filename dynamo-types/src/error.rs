/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The JSON body the service sends with a non-200 status.

use serde::Deserialize;

/// Raised when the request rate is above the table's provisioned throughput.
pub const PROVISIONED_THROUGHPUT_EXCEEDED: &str = "ProvisionedThroughputExceededException";
/// Raised when the named table or index does not exist.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ServiceErrorBody {
    /// Fully qualified type, e.g. `com.amazonaws.dynamodb.v20120810#ResourceNotFoundException`
    #[serde(rename = "__type", default)]
    pub error_type: String,
    #[serde(alias = "Message", default)]
    pub message: Option<String>,
}

impl ServiceErrorBody {
    /// The error code without its namespace prefix.
    pub fn code(&self) -> &str {
        match self.error_type.rsplit_once('#') {
            Some((_, code)) => code,
            None => &self.error_type,
        }
    }
}
