/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Wire shapes for the DynamoDB JSON protocol.
//!
//! Nothing in this crate performs I/O or marshaling; it only describes what goes over the wire.

pub mod base64;
pub mod error;
pub mod input;
pub mod model;
pub mod output;

mod attribute;
mod blob;

pub use attribute::{AttributeSet, AttributeType, AttributeValue, UnknownAttributeType};
pub use blob::Blob;

/// Maximum number of put or delete requests in one BatchWriteItem call.
pub const BATCH_WRITE_ITEM_LIMIT: usize = 25;
/// Maximum number of keys in one BatchGetItem call.
pub const BATCH_GET_ITEM_LIMIT: usize = 100;
/// Maximum size of a request body.
pub const REQUEST_SIZE_LIMIT_BYTES: usize = 1_000_000;
pub const MIN_TABLE_NAME_LEN: usize = 3;
pub const MAX_TABLE_NAME_LEN: usize = 255;
/// Significant digits the store keeps for a number.
pub const NUMBER_PRECISION_DIGITS: usize = 38;
