use super::error::SchemaError;
use super::validator::{Validator, ValidatorKind};

/// 验证值是否符合校验器
pub fn check_value(
    validator: &Validator,
    value: &serde_json::Value,
    path: &mut Vec<String>,
) -> std::result::Result<(), SchemaError> {
    match &validator.kind {
        ValidatorKind::String { enum_values } => {
            let text = value.as_str().ok_or_else(|| SchemaError::Validation {
                message: "expected string".to_string(),
                path: path.clone(),
            })?;
            if let Some(options) = enum_values {
                if !options.iter().any(|option| option == text) {
                    return Err(SchemaError::Validation {
                        message: format!("`{}` is not one of [{}]", text, options.join(", ")),
                        path: path.clone(),
                    });
                }
            }
        }
        ValidatorKind::Number => {
            if !value.is_number() {
                return Err(SchemaError::Validation {
                    message: "expected number".to_string(),
                    path: path.clone(),
                });
            }
        }
        ValidatorKind::Integer => {
            if !value.is_i64() {
                return Err(SchemaError::Validation {
                    message: "expected integer".to_string(),
                    path: path.clone(),
                });
            }
        }
        ValidatorKind::Boolean => {
            if !value.is_boolean() {
                return Err(SchemaError::Validation {
                    message: "expected boolean".to_string(),
                    path: path.clone(),
                });
            }
        }
        ValidatorKind::Array { items } => {
            if let Some(array) = value.as_array() {
                for (idx, element) in array.iter().enumerate() {
                    path.push(idx.to_string());
                    check_value(items, element, path)?;
                    path.pop();
                }
            } else {
                return Err(SchemaError::Validation {
                    message: "expected array".to_string(),
                    path: path.clone(),
                });
            }
        }
        ValidatorKind::Object {
            fields,
            required,
            additional,
        } => {
            let object = value.as_object().ok_or_else(|| SchemaError::Validation {
                message: "expected object".to_string(),
                path: path.clone(),
            })?;

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
                if let Some(field) = fields.get(key) {
                    path.push(key.clone());
                    check_value(field, val, path)?;
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
        ValidatorKind::Any => {}
    }

    Ok(())
}
