use serde_json::Value;

use super::error::SchemaError;
use super::schema::{Schema, SchemaKind};

fn mismatch(expected: &str, path: &[String]) -> SchemaError {
    SchemaError::Validation {
        message: format!("expected {}", expected),
        path: path.to_vec(),
    }
}

/// 验证值是否符合 Schema
pub fn validate_value(
    schema: &Schema,
    value: &Value,
    path: &mut Vec<String>,
) -> std::result::Result<(), SchemaError> {
    match &schema.kind {
        SchemaKind::Null => {
            if !value.is_null() {
                return Err(mismatch("null", path));
            }
        }
        SchemaKind::Boolean => {
            if !value.is_boolean() {
                return Err(mismatch("boolean", path));
            }
        }
        SchemaKind::Integer => {
            if !value.is_i64() && !value.is_u64() {
                return Err(mismatch("integer", path));
            }
        }
        SchemaKind::Number => {
            if !value.is_number() {
                return Err(mismatch("number", path));
            }
        }
        SchemaKind::String => {
            if !value.is_string() {
                return Err(mismatch("string", path));
            }
        }
        SchemaKind::Array { items } => {
            let array = value.as_array().ok_or_else(|| mismatch("array", path))?;
            for (idx, element) in array.iter().enumerate() {
                path.push(idx.to_string());
                validate_value(items, element, path)?;
                path.pop();
            }
        }
        SchemaKind::Map { values } => {
            let object = value.as_object().ok_or_else(|| mismatch("object", path))?;
            for (key, val) in object {
                path.push(key.clone());
                validate_value(values, val, path)?;
                path.pop();
            }
        }
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => {
            let object = value.as_object().ok_or_else(|| mismatch("object", path))?;

            for key in required {
                if !object.contains_key(key) {
                    let mut required_path = path.clone();
                    required_path.push(key.clone());
                    return Err(SchemaError::Validation {
                        message: format!("missing required property `{}`", key),
                        path: required_path,
                    });
                }
            }

            for (key, val) in object {
                if let Some(sub_schema) = properties.get(key) {
                    path.push(key.clone());
                    validate_value(sub_schema, val, path)?;
                    path.pop();
                } else if !additional {
                    let mut extra_path = path.clone();
                    extra_path.push(key.clone());
                    return Err(SchemaError::Validation {
                        message: format!("unexpected property `{}`", key),
                        path: extra_path,
                    });
                }
            }
        }
        SchemaKind::Any => {}
    }

    Ok(())
}
