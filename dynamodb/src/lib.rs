/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Amazon DynamoDB client for the JSON 1.0 protocol.
//!
//! Records are marshaled with [`dynamo_marshal`]; requests and responses use the shapes in
//! [`dynamo_types`]. The client sends requests through any `tower::Service`, so transport,
//! retries and request signing are layered on by the caller.
//!
//! ```no_run
//! use dynamodb::{Client, Config};
//! use dynamo_marshal::dynamo_item;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Movie {
//!     title: String,
//!     year: u16,
//! }
//! dynamo_item!(Movie { title: "Title", year: "Year" });
//!
//! # async fn run<C>(connector: C) -> Result<(), dynamodb::Error>
//! # where
//! #     C: tower::Service<http::Request<bytes::Bytes>, Response = http::Response<bytes::Bytes>> + Clone,
//! #     C::Error: Into<dynamodb::BoxError>,
//! # {
//! let client = Client::new(Config::from_env(), connector);
//! client
//!     .put_item("movies", &Movie { title: "Alien".into(), year: 1979 })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
mod error;
pub mod operation;

#[cfg(feature = "test-util")]
pub mod test_connection;

pub use client::Client;
pub use config::{Config, Region};
pub use error::{BoxError, Error, ServiceError};
pub use operation::Target;

pub use dynamo_marshal;
pub use dynamo_types;
