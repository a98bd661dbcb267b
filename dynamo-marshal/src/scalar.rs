/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Text and binary payloads of single values.

use crate::error::EncodeError;
use crate::value::{Kind, Value};
use dynamo_types::{base64, NUMBER_PRECISION_DIGITS};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER: Regex =
        Regex::new(r"^[-+]?[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?$").expect("valid regex");
}

/// Returns `true` if `text` is a decimal number the store will accept as an `N` payload.
pub(crate) fn is_number_text(text: &str) -> bool {
    NUMBER.is_match(text)
}

/// Encodes a value as the text payload of an `S` or `N` attribute.
///
/// Composites without a native representation are rendered as JSON. Absent values and units
/// encode as the empty string, which the caller then drops.
pub(crate) fn encode_scalar(value: &Value) -> Result<String, EncodeError> {
    Ok(match value {
        Value::Null | Value::Unit => String::new(),
        Value::Present(inner) => return encode_scalar(inner),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Int(i) => itoa::Buffer::new().format(*i).to_string(),
        Value::UInt(u) => itoa::Buffer::new().format(*u).to_string(),
        Value::Float(f) => format_number(*f)?,
        Value::Char(c) => c.to_string(),
        Value::Str(s) => s.clone(),
        Value::Bytes(b) => base64::encode(b),
        Value::Seq(_) | Value::Map(_) | Value::Struct(_) | Value::Variant { .. } => {
            serde_json::to_string(value)?
        }
    })
}

/// Returns the bytes of a byte-like value: a byte string, a sequence of integers in `0..=255`
/// or text. `None` when the value is not byte-like.
pub(crate) fn binary(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Present(inner) => binary(inner),
        Value::Bytes(b) => Some(b.clone()),
        Value::Str(s) => Some(s.as_bytes().to_vec()),
        Value::Seq(items) => items
            .iter()
            .map(|item| match item {
                Value::UInt(u) => u8::try_from(*u).ok(),
                Value::Int(i) => u8::try_from(*i).ok(),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Encodes a value that must be a number: a numeric kind, or text that already reads as one.
pub(crate) fn numeric(value: &Value) -> Option<Result<String, EncodeError>> {
    match value {
        Value::Null => Some(Ok(String::new())),
        Value::Present(inner) => numeric(inner),
        Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Float(_) => {
            Some(encode_scalar(value))
        }
        Value::Str(s) if s.is_empty() || is_number_text(s) => Some(Ok(s.clone())),
        Value::Char(c) if c.is_ascii_digit() => Some(Ok(c.to_string())),
        _ => None,
    }
}

/// Formats a float with up to 38 significant digits, the precision the store keeps.
///
/// The exact decimal value is rounded to 38 digits and trailing zeros are dropped. Exponent
/// notation (`9.5367431640625E-07`) is used only when the exponent is below -4 or 38 and
/// above. Zero is written as `0`, whatever its sign.
///
/// ```
/// use dynamo_marshal::format_number;
///
/// assert_eq!(format_number(5.0).unwrap(), "5");
/// assert_eq!(format_number(123456789012345.125).unwrap(), "123456789012345.125");
/// assert_eq!(format_number(2f64.powi(-20)).unwrap(), "9.5367431640625E-07");
/// assert_eq!(format_number(-0.00001).unwrap(), "-1.0000000000000000818030539140313095459E-05");
/// ```
pub fn format_number(value: f64) -> Result<String, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFiniteNumber(value));
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }

    let scientific = format!("{:.*e}", NUMBER_PRECISION_DIGITS - 1, value.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => unreachable!("`{{:e}}` always writes an exponent"),
    };
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => unreachable!("`{{:e}}` writes a decimal exponent"),
    };
    let mut digits: Vec<char> = mantissa.chars().filter(|c| *c != '.').collect();
    while digits.len() > 1 && digits.last() == Some(&'0') {
        digits.pop();
    }

    let significant = digits.len() as i32;
    let decimal_point = exponent + 1;

    let mut out = String::with_capacity(NUMBER_PRECISION_DIGITS + 8);
    if value < 0.0 {
        out.push('-');
    }
    if exponent < -4 || exponent >= NUMBER_PRECISION_DIGITS as i32 {
        out.push(digits[0]);
        if digits.len() > 1 {
            out.push('.');
            out.extend(&digits[1..]);
        }
        out.push('E');
        out.push(if exponent < 0 { '-' } else { '+' });
        let magnitude = exponent.unsigned_abs();
        if magnitude < 10 {
            out.push('0');
        }
        out.push_str(itoa::Buffer::new().format(magnitude));
    } else {
        let digit_at = |i: i32| -> char {
            if i >= 0 && i < significant {
                digits[i as usize]
            } else {
                '0'
            }
        };
        if decimal_point > 0 {
            out.extend((0..decimal_point).map(digit_at));
        } else {
            out.push('0');
        }
        let decimals = (significant - decimal_point).max(0);
        if decimals > 0 {
            out.push('.');
            out.extend((decimal_point..decimal_point + decimals).map(digit_at));
        }
    }
    Ok(out)
}

/// The kind reported when a value is refused.
pub(crate) fn reported_kind(value: &Value) -> Kind {
    value.deref_once().kind()
}
