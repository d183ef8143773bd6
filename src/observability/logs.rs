//! Conversion of request payloads into log record attributes.

use opentelemetry::logs::AnyValue;
use opentelemetry::{Key, StringValue};
use serde_json::Value;

/// Convert a JSON value into an OpenTelemetry attribute value.
pub fn json_to_any_value(value: &Value) -> AnyValue {
    match value {
        Value::Null => AnyValue::String(StringValue::from("null")),
        Value::Bool(flag) => AnyValue::Boolean(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(int) => AnyValue::Int(int),
            None => AnyValue::Double(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(text) => AnyValue::String(StringValue::from(text.clone())),
        Value::Array(items) => {
            AnyValue::ListAny(Box::new(items.iter().map(json_to_any_value).collect()))
        }
        Value::Object(map) => AnyValue::Map(Box::new(
            map.iter()
                .map(|(key, value)| (Key::new(key.clone()), json_to_any_value(value)))
                .collect(),
        )),
    }
}

/// Flatten a JSON object into log attributes.
///
/// Non-object values carry no named fields and produce no attributes.
pub fn json_object_to_attributes(value: &Value) -> Vec<(Key, AnyValue)> {
    match value.as_object() {
        Some(map) => map
            .iter()
            .map(|(key, value)| (Key::new(key.clone()), json_to_any_value(value)))
            .collect(),
        None => Vec::new(),
    }
}
