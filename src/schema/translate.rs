use std::collections::HashMap;

use serde_json::Value;

use super::validator::{Validator, ValidatorKind};

/// 将 JSON Schema 片段翻译为运行时校验器
///
/// 宽容降级：无法识别的形状一律翻译为接受任意值的校验器，翻译本身
/// 永远不报错。`type` 和 `properties` 都缺失时也降级为 Any。
pub fn translate(schema: &Value) -> Validator {
    let Some(object) = schema.as_object() else {
        return Validator::any();
    };

    match object.get("type").and_then(Value::as_str) {
        Some("string") => translate_string(schema),
        Some("number") => Validator::new(ValidatorKind::Number),
        Some("integer") => Validator::new(ValidatorKind::Integer),
        Some("boolean") => Validator::new(ValidatorKind::Boolean),
        Some("array") => translate_array(schema),
        Some("object") => translate_object(schema),
        Some(_) => Validator::any(),
        None => {
            // type 缺失但有 properties 时按隐式 object 处理
            if object.contains_key("properties") {
                translate_object(schema)
            } else {
                Validator::any()
            }
        }
    }
}

fn translate_string(schema: &Value) -> Validator {
    let enum_values = schema.get("enum").and_then(Value::as_array).map(|options| {
        options
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });
    Validator::new(ValidatorKind::String { enum_values })
}

fn translate_array(schema: &Value) -> Validator {
    let items = schema
        .get("items")
        .map(translate)
        .unwrap_or_else(Validator::any);
    Validator::new(ValidatorKind::Array {
        items: Box::new(items),
    })
}

fn translate_object(schema: &Value) -> Validator {
    let fields: HashMap<String, Validator> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(name, sub_schema)| (name.clone(), translate(sub_schema)))
                .collect()
        })
        .unwrap_or_default();

    let required: Vec<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let additional = schema
        .get("additionalProperties")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Validator::new(ValidatorKind::Object {
        fields,
        required,
        additional,
    })
}
