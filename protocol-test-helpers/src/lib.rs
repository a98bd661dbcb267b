/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Assertions comparing the requests a client sends with the requests a test expects.

use assert_json_diff::assert_json_eq_no_panic;
use http::Request;
use pretty_assertions::Comparison;
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ProtocolTestFailure {
    #[error("invalid header value for key `{key}`: expected `{expected}`, found `{found}`")]
    InvalidHeader {
        key: String,
        expected: String,
        found: String,
    },
    #[error("missing required header: `{expected}`")]
    MissingHeader { expected: String },
    #[error("body did not match. {hint}\n{comparison:?}")]
    BodyDidNotMatch {
        comparison: PrettyString,
        hint: String,
    },
    #[error("expected body to be valid {expected} but it was not: {found}")]
    InvalidBodyFormat { expected: String, found: String },
}

/// A `String` whose `Debug` output is the string itself, so diffs print with real newlines.
#[derive(Eq, PartialEq)]
pub struct PrettyString(String);

impl Debug for PrettyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How to compare two bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    /// Compared as JSON documents: member order and whitespace are ignored.
    Json,
    /// Compared byte for byte.
    Other(String),
}

impl<T: AsRef<str>> From<T> for MediaType {
    fn from(inp: T) -> Self {
        match inp.as_ref() {
            "application/json" | "application/x-amz-json-1.0" | "application/x-amz-json-1.1" => {
                MediaType::Json
            }
            other => MediaType::Other(other.to_string()),
        }
    }
}

/// Check that the protocol test succeeded & print the pretty error
/// if it did not
///
/// The primary motivation is making multiline debug output
/// readable & using the cleaner Display implementation
#[track_caller]
pub fn assert_ok(inp: Result<(), ProtocolTestFailure>) {
    if let Err(e) = inp {
        eprintln!("{}", e);
        panic!("Protocol test failed");
    }
}

/// Headers are compared by value; repeated headers are joined with `, ` first.
pub fn validate_headers<B>(
    request: &Request<B>,
    expected_headers: &[(&str, &str)],
) -> Result<(), ProtocolTestFailure> {
    for (key, expected_value) in expected_headers {
        if !request.headers().contains_key(*key) {
            return Err(ProtocolTestFailure::MissingHeader {
                expected: key.to_string(),
            });
        }
        let actual_value: String = request
            .headers()
            .get_all(*key)
            .iter()
            .map(|hv| String::from_utf8_lossy(hv.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        if *expected_value != actual_value {
            return Err(ProtocolTestFailure::InvalidHeader {
                key: key.to_string(),
                expected: expected_value.to_string(),
                found: actual_value,
            });
        }
    }
    Ok(())
}

pub fn validate_body<T: AsRef<[u8]>>(
    actual_body: T,
    expected_body: &str,
    media_type: MediaType,
) -> Result<(), ProtocolTestFailure> {
    let body_str = std::str::from_utf8(actual_body.as_ref());
    match (media_type, body_str) {
        (MediaType::Json, Ok(actual_body)) => validate_json_body(actual_body, expected_body),
        (MediaType::Json, Err(_)) => Err(ProtocolTestFailure::InvalidBodyFormat {
            expected: "json".to_owned(),
            found: "input was not valid UTF-8".to_owned(),
        }),
        (MediaType::Other(media_type), _) => {
            if actual_body.as_ref() != expected_body.as_bytes() {
                Err(ProtocolTestFailure::BodyDidNotMatch {
                    comparison: pretty_comparison(
                        &String::from_utf8_lossy(actual_body.as_ref()),
                        expected_body,
                    ),
                    hint: format!("media type: {}", media_type),
                })
            } else {
                Ok(())
            }
        }
    }
}

fn validate_json_body(actual: &str, expected: &str) -> Result<(), ProtocolTestFailure> {
    let actual_json: serde_json::Value =
        serde_json::from_str(actual).map_err(|e| ProtocolTestFailure::InvalidBodyFormat {
            expected: "json".to_owned(),
            found: format!("{}{}", e, actual),
        })?;
    let expected_json: serde_json::Value =
        serde_json::from_str(expected).map_err(|e| ProtocolTestFailure::InvalidBodyFormat {
            expected: "json".to_owned(),
            found: format!("expected body was not valid json: {}", e),
        })?;
    assert_json_eq_no_panic(&actual_json, &expected_json).map_err(|message| {
        ProtocolTestFailure::BodyDidNotMatch {
            comparison: pretty_comparison(actual, expected),
            hint: message,
        }
    })
}

fn pretty_comparison(left: &str, right: &str) -> PrettyString {
    PrettyString(format!(
        "{}",
        Comparison::new(&PrettyString(left.to_string()), &PrettyString(right.to_string()))
    ))
}
