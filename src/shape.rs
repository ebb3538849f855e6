//! Structural verification helpers over raw JSON documents.
//!
//! Shape checks run against the raw wire document, not the typed decode, so
//! an extra key the deserializer would silently drop still fails. All
//! helpers take a `context` string (a JSON-pointer-ish path) that ends up in
//! the mismatch message.

use crate::error::{ConformanceError, ConformanceResult};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

/// Assert that `value` is an object whose key set equals `expected` exactly.
///
/// The mismatch message lists missing and unexpected keys separately.
pub fn expect_exact_keys(
    context: &str,
    value: &Value,
    expected: &[&str],
) -> ConformanceResult<()> {
    let object = value.as_object().ok_or_else(|| {
        ConformanceError::shape_mismatch(context, format!("expected object, got {}", kind(value)))
    })?;

    let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    let wanted: BTreeSet<&str> = expected.iter().copied().collect();

    if actual == wanted {
        return Ok(());
    }

    let missing: Vec<&str> = wanted.difference(&actual).copied().collect();
    let unexpected: Vec<&str> = actual.difference(&wanted).copied().collect();
    Err(ConformanceError::shape_mismatch(
        context,
        format!("key set differs: missing {missing:?}, unexpected {unexpected:?}"),
    ))
}

/// Look up a field, requiring it to be present (it may still be null).
pub fn field<'a>(context: &str, value: &'a Value, key: &str) -> ConformanceResult<&'a Value> {
    value.get(key).ok_or_else(|| {
        ConformanceError::shape_mismatch(context, format!("missing field `{key}`"))
    })
}

/// Resolve a JSON pointer, requiring the target to exist.
pub fn pointer<'a>(context: &str, value: &'a Value, ptr: &str) -> ConformanceResult<&'a Value> {
    value.pointer(ptr).ok_or_else(|| {
        ConformanceError::shape_mismatch(context, format!("no value at pointer `{ptr}`"))
    })
}

/// Require a string field and return it.
pub fn expect_string<'a>(
    context: &str,
    value: &'a Value,
    key: &str,
) -> ConformanceResult<&'a str> {
    let found = field(context, value, key)?;
    found.as_str().ok_or_else(|| {
        ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` should be a string, got {}", kind(found)),
        )
    })
}

/// Require an unsigned integer field and return it.
pub fn expect_u64(context: &str, value: &Value, key: &str) -> ConformanceResult<u64> {
    let found = field(context, value, key)?;
    found.as_u64().ok_or_else(|| {
        ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` should be an unsigned integer, got {}", kind(found)),
        )
    })
}

/// Require a field to be present with an explicit null value.
///
/// The mock serializes optional fields as nulls rather than omitting them;
/// an absent field is a contract violation even though a typed decode would
/// not notice.
pub fn expect_null(context: &str, value: &Value, key: &str) -> ConformanceResult<()> {
    let found = field(context, value, key)?;
    if found.is_null() {
        Ok(())
    } else {
        Err(ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` should be null, got {}", kind(found)),
        ))
    }
}

/// Require a string field to equal a literal.
pub fn expect_literal(
    context: &str,
    value: &Value,
    key: &str,
    literal: &str,
) -> ConformanceResult<()> {
    let found = expect_string(context, value, key)?;
    if found == literal {
        Ok(())
    } else {
        Err(ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` should be {literal:?}, got {found:?}"),
        ))
    }
}

/// Require an array field of exactly `len` elements and return it.
pub fn expect_array_len<'a>(
    context: &str,
    value: &'a Value,
    key: &str,
    len: usize,
) -> ConformanceResult<&'a Vec<Value>> {
    let found = field(context, value, key)?;
    let array = found.as_array().ok_or_else(|| {
        ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` should be an array, got {}", kind(found)),
        )
    })?;
    if array.len() == len {
        Ok(array)
    } else {
        Err(ConformanceError::shape_mismatch(
            context,
            format!("array `{key}` should have {len} elements, got {}", array.len()),
        ))
    }
}

/// Require an identifier to match the documented prefix+hex format.
pub fn expect_id(context: &str, id: &str, format: &Regex) -> ConformanceResult<()> {
    if format.is_match(id) {
        Ok(())
    } else {
        Err(ConformanceError::shape_mismatch(
            context,
            format!("identifier {id:?} does not match {}", format.as_str()),
        ))
    }
}

/// Require a unix timestamp to be positive and not meaningfully in the
/// future. The mock stamps responses at serve time; a minute of skew covers
/// clock drift between harness and server.
pub fn expect_recent_timestamp(context: &str, key: &str, timestamp: i64) -> ConformanceResult<()> {
    let now = chrono::Utc::now().timestamp();
    if timestamp <= 0 {
        return Err(ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` should be a positive unix timestamp, got {timestamp}"),
        ));
    }
    if timestamp > now + 60 {
        return Err(ConformanceError::shape_mismatch(
            context,
            format!("field `{key}` is in the future: {timestamp} > {now}"),
        ));
    }
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
