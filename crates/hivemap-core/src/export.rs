// ── CSV export ──
//
// Rows are the fixture objects as loaded. The header row is the key order of
// the first record. Every field is its JSON text with nulls replaced by empty
// strings at any depth, so strings keep their quotes and a null reads `""`.
// Keys missing from a later record produce an empty field. Rows are joined
// with CRLF and the last row has no terminator.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::Facility;

/// Default file name offered by the front ends.
pub const DEFAULT_FILE_NAME: &str = "facilities.csv";

/// Render `rows` as CSV. An empty slice yields an empty string.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, CoreError> {
    let objects = rows
        .iter()
        .map(|row| match serde_json::to_value(row) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(CoreError::Export {
                message: format!("expected an object per row, got {}", json_kind(&other)),
            }),
            Err(e) => Err(CoreError::Export {
                message: e.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Some(first) = objects.first() else {
        return Ok(String::new());
    };
    let header: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut lines = Vec::with_capacity(objects.len() + 1);
    lines.push(header.join(","));
    for object in &objects {
        lines.push(row_line(object, &header));
    }
    Ok(lines.join("\r\n"))
}

/// Export rows for `facilities`: the fixture object each one was read from,
/// or the serialized model when it was built in code.
pub fn facility_rows(facilities: &[Arc<Facility>]) -> Result<Vec<Value>, CoreError> {
    facilities
        .iter()
        .map(|facility| {
            if facility.source.is_empty() {
                serde_json::to_value(facility.as_ref()).map_err(|e| CoreError::Export {
                    message: e.to_string(),
                })
            } else {
                Ok(Value::Object(facility.source.clone()))
            }
        })
        .collect()
}

fn row_line(object: &Map<String, Value>, header: &[&str]) -> String {
    header
        .iter()
        .map(|key| object.get(*key).map(field).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

fn field(value: &Value) -> String {
    blank_nulls(value.clone()).to_string()
}

/// Replace every `null`, at any depth, with `""`.
fn blank_nulls(value: Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Array(items) => Value::Array(items.into_iter().map(blank_nulls).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, blank_nulls(v)))
                .collect(),
        ),
        other => other,
    }
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
