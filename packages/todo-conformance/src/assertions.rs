//! Response assertions.
//!
//! Every check returns a contract violation naming the step, the property,
//! the expected value and the actual value instead of panicking, so the
//! scenario can report the failure and stop.

use serde_json::Value;

use crate::client::{Exchange, JSON_UTF8};
use crate::error::ConformanceError;
use crate::model::TodoItem;
use crate::scenario::Step;

/// Checks the status code.
pub fn expect_status(step: Step, exchange: &Exchange, expected: u16) -> Result<(), ConformanceError> {
    if exchange.status == expected {
        Ok(())
    } else {
        Err(ConformanceError::contract(
            step,
            "status",
            expected,
            exchange.status,
        ))
    }
}

/// Checks that `Content-Type` is exactly `application/json; charset=utf-8`.
pub fn expect_json_content_type(step: Step, exchange: &Exchange) -> Result<(), ConformanceError> {
    match exchange.content_type.as_deref() {
        Some(JSON_UTF8) => Ok(()),
        Some(other) => Err(ConformanceError::contract(
            step,
            "content-type",
            format!("{:?}", JSON_UTF8),
            format!("{:?}", other),
        )),
        None => Err(ConformanceError::contract(
            step,
            "content-type",
            format!("{:?}", JSON_UTF8),
            "no header",
        )),
    }
}

/// Checks status 200 with a JSON content type and decodes the body.
pub fn expect_json_ok(step: Step, exchange: &Exchange) -> Result<Value, ConformanceError> {
    expect_status(step, exchange, 200)?;
    expect_json_content_type(step, exchange)?;
    exchange.json(step)
}

/// Checks that the body is an empty JSON array.
pub fn expect_empty_array(step: Step, body: &Value) -> Result<(), ConformanceError> {
    match body {
        Value::Array(items) if items.is_empty() => Ok(()),
        Value::Array(items) => Err(ConformanceError::contract(
            step,
            "collection",
            "empty",
            format!("{} item(s)", items.len()),
        )),
        other => Err(ConformanceError::contract(
            step,
            "body",
            "an array",
            json_kind(other),
        )),
    }
}

/// Returns the string field `field`, failing if it is missing or not a string.
pub fn expect_string_field<'a>(
    step: Step,
    body: &'a Value,
    field: &str,
) -> Result<&'a str, ConformanceError> {
    match body.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(ConformanceError::contract(
            step,
            format!("field `{}`", field),
            "a string",
            json_kind(other),
        )),
        None => Err(ConformanceError::contract(
            step,
            format!("field `{}`", field),
            "present",
            "missing",
        )),
    }
}

/// Checks that `field` equals `expected`.
pub fn expect_field(
    step: Step,
    body: &Value,
    field: &str,
    expected: &Value,
) -> Result<(), ConformanceError> {
    match body.get(field) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(ConformanceError::contract(
            step,
            format!("field `{}`", field),
            expected,
            actual,
        )),
        None => Err(ConformanceError::contract(
            step,
            format!("field `{}`", field),
            expected,
            "missing",
        )),
    }
}

/// Checks every field of an item.
pub fn expect_item(step: Step, body: &Value, expected: &TodoItem) -> Result<(), ConformanceError> {
    if !body.is_object() {
        return Err(ConformanceError::contract(
            step,
            "body",
            "an object",
            json_kind(body),
        ));
    }
    expect_field(step, body, "id", &Value::from(expected.id.as_str()))?;
    expect_field(step, body, "title", &Value::from(expected.title.as_str()))?;
    expect_field(step, body, "completed", &Value::from(expected.completed))?;
    expect_field(step, body, "order", &Value::from(expected.order))?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
