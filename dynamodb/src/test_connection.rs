/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! A connector that replays canned responses, for testing code built on [`Client`](crate::Client).

use crate::error::BoxError;
use bytes::Bytes;
use http::header::{HeaderName, CONTENT_TYPE};
use protocol_test_helpers::{assert_ok, validate_body, MediaType};
use std::future::Ready;
use std::ops::Deref;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

type ConnectVec = Vec<(http::Request<Bytes>, http::Response<Bytes>)>;

/// A request the connection received, next to the one the test expected.
#[derive(Debug)]
pub struct ValidateRequest {
    pub expected: http::Request<Bytes>,
    pub actual: http::Request<Bytes>,
}

impl ValidateRequest {
    /// Compares headers (except `ignore_headers`), the URI and the body.
    ///
    /// JSON bodies are compared structurally, so member order does not matter.
    pub fn assert_matches(&self, ignore_headers: &[HeaderName]) {
        let (actual, expected) = (&self.actual, &self.expected);
        for (name, value) in expected.headers() {
            if !ignore_headers.contains(name) {
                let actual_header = actual
                    .headers()
                    .get(name)
                    .unwrap_or_else(|| panic!("Header {:?} missing", name));
                assert_eq!(actual_header, value, "Header mismatch for {:?}", name);
            }
        }
        let is_json = actual
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json"))
            .unwrap_or(false);
        let media_type = if is_json {
            MediaType::Json
        } else {
            MediaType::Other("unknown".to_string())
        };
        match (
            std::str::from_utf8(actual.body()),
            std::str::from_utf8(expected.body()),
        ) {
            (Ok(actual), Ok(expected)) => assert_ok(validate_body(actual, expected, media_type)),
            _ => assert_eq!(actual.body(), expected.body()),
        };
        assert_eq!(actual.uri(), expected.uri());
    }
}

/// Answers requests with a preloaded series of responses and records every request.
///
/// ```
/// use bytes::Bytes;
/// use dynamodb::test_connection::TestConnection;
///
/// let conn = TestConnection::new(vec![(
///     http::Request::new(Bytes::from_static(b"{}")),
///     http::Response::builder()
///         .status(200)
///         .body(Bytes::from_static(br#"{"TableNames":[]}"#))
///         .unwrap(),
/// )]);
/// let client = dynamodb::Client::new(dynamodb::Config::builder().build(), conn.clone());
/// # let _ = client;
/// ```
#[derive(Debug, Clone)]
pub struct TestConnection {
    data: Arc<Mutex<ConnectVec>>,
    requests: Arc<Mutex<Vec<ValidateRequest>>>,
}

impl TestConnection {
    pub fn new(mut data: ConnectVec) -> Self {
        data.reverse();
        TestConnection {
            data: Arc::new(Mutex::new(data)),
            requests: Default::default(),
        }
    }

    pub fn requests(&self) -> impl Deref<Target = Vec<ValidateRequest>> + '_ {
        self.requests.lock().unwrap()
    }

    /// Asserts every recorded request matched and no canned response is left over.
    pub fn assert_requests_match(&self, ignore_headers: &[HeaderName]) {
        for req in self.requests().iter() {
            req.assert_matches(ignore_headers)
        }
        let remaining_requests = self.data.lock().unwrap().len();
        let actual_requests = self.requests().len();
        assert_eq!(
            remaining_requests, 0,
            "Expected {} additional requests ({} were made)",
            remaining_requests, actual_requests
        );
    }
}

impl tower::Service<http::Request<Bytes>> for TestConnection {
    type Response = http::Response<Bytes>;
    type Error = BoxError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, actual: http::Request<Bytes>) -> Self::Future {
        if let Some((expected, resp)) = self.data.lock().unwrap().pop() {
            self.requests
                .lock()
                .unwrap()
                .push(ValidateRequest { expected, actual });
            std::future::ready(Ok(resp))
        } else {
            std::future::ready(Err("No more data".into()))
        }
    }
}
