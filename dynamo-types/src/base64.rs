/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! A thin wrapper over `base64-simd`, used for `B` and `BS` payloads.

use base64_simd::STANDARD;

/// Decode `input` from base64 using the standard base64 alphabet
///
/// If input is not a valid base64 encoded string, this function returns an error.
pub fn decode(input: impl AsRef<str>) -> Result<Vec<u8>, base64_simd::Error> {
    STANDARD.decode_to_vec(input.as_ref().as_bytes())
}

/// Encode `input` into base64 using the standard base64 alphabet
pub fn encode(input: impl AsRef<[u8]>) -> String {
    STANDARD.encode_to_string(input.as_ref())
}
