//! Reading parameter objects and writing responses as JSON

use gwdomain_core::error::ProviderError;
use gwdomain_core::operation::Operation;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Error code for a parameter object no SDK input can be built from
pub const PARAM_VALIDATION_CODE: &str = "ParamValidationError";

pub fn invalid(operation: Operation, message: &str) -> ProviderError {
    ProviderError::new(PARAM_VALIDATION_CODE, format!("{}: {}", operation, message))
}

/// A non-empty string parameter the operation cannot run without
pub fn required(params: &Value, operation: Operation, name: &str) -> Result<String, ProviderError> {
    match params.get(name).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(invalid(
            operation,
            &format!("missing required parameter '{}'", name),
        )),
    }
}

/// A string parameter; empty strings are kept (an empty v2 mapping key is
/// meaningful)
pub fn optional(params: &Value, name: &str) -> Option<String> {
    params.get(name).and_then(Value::as_str).map(str::to_string)
}

/// A string map parameter, `None` when absent or empty
pub fn tags(params: &Value, name: &str) -> Option<HashMap<String, String>> {
    let tags: HashMap<String, String> = params
        .get(name)
        .and_then(Value::as_object)?
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
        .collect();
    (!tags.is_empty()).then_some(tags)
}

/// SDK string accessor (optional or not) as JSON
pub fn text<'a>(value: impl Into<Option<&'a str>>) -> Value {
    value
        .into()
        .map(|s| Value::String(s.to_string()))
        .unwrap_or(Value::Null)
}

pub fn string_map(map: Option<&HashMap<String, String>>) -> Value {
    map.map(|map| {
        Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect(),
        )
    })
    .unwrap_or(Value::Null)
}

/// JSON object of the non-null fields
pub fn object(fields: Vec<(&str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| (name.to_string(), value))
            .collect::<Map<String, Value>>(),
    )
}
