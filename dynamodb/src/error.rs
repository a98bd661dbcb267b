/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use dynamo_marshal::MarshalError;
use dynamo_types::error::{ServiceErrorBody, PROVISIONED_THROUGHPUT_EXCEEDED, RESOURCE_NOT_FOUND};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a client operation.
///
/// Construction failures happen before anything is sent; the remaining variants describe what
/// went wrong once the request was handed to the connector.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A record could not be marshaled into the request.
    #[error("failed to marshal request")]
    Marshal(#[from] MarshalError),

    /// Arguments the service would reject, caught before sending.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request body is {size} bytes, over the {limit} byte limit")]
    RequestTooLarge { size: usize, limit: usize },

    /// The HTTP request could not be built.
    #[error("failed to construct request: {0}")]
    Construction(#[source] BoxError),

    /// The connector failed; the request may or may not have reached the service.
    #[error("failed to dispatch request: {0}")]
    Dispatch(#[source] BoxError),

    /// The service answered with a non-200 status.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A 200 response whose body did not decode.
    #[error("failed to decode response: {0}")]
    Response(#[source] BoxError),
}

impl Error {
    /// The service error, when the service answered with one.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::Service(err) => Some(err),
            _ => None,
        }
    }
}

/// An error reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    status: u16,
    code: Option<String>,
    message: String,
}

impl ServiceError {
    /// Parses the error document of a response with status `status`.
    ///
    /// Bodies that are not the service's JSON error document are kept verbatim as the message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ServiceErrorBody>(body) {
            Ok(parsed) if !parsed.error_type.is_empty() => ServiceError {
                status,
                code: Some(parsed.code().to_string()),
                message: parsed.message.unwrap_or_default(),
            },
            _ => ServiceError {
                status,
                code: None,
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// The error code without its namespace, e.g. `ResourceNotFoundException`.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_throttling(&self) -> bool {
        self.code() == Some(PROVISIONED_THROUGHPUT_EXCEEDED)
    }

    pub fn is_resource_not_found(&self) -> bool {
        self.code() == Some(RESOURCE_NOT_FOUND)
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "status code {} returned", self.status)?;
        if let Some(code) = &self.code {
            write!(f, ": {}", code)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}
