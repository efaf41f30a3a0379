use serde_json::{json, Value};

use crate::error::{RefineFlowError, Result};

/// 收尾时的输出标准化
///
/// 没有任何步骤产出输出时返回 `{"result": ""}`；裸字符串和缺少
/// 非空 `result` 字段的对象都是致命错误；合格对象原样返回，
/// `result` 之外的字段保留。
pub fn standardize_output(output: Option<Value>) -> Result<Value> {
    let Some(value) = output else {
        return Ok(json!({ "result": "" }));
    };

    match &value {
        Value::String(text) => Err(RefineFlowError::OutputShape(format!(
            "final output was the bare string `{}`; a structured object with a `result` property is required",
            text
        ))),
        Value::Object(fields) => {
            let has_result = fields.get("result").map(is_truthy).unwrap_or(false);
            if has_result {
                Ok(value)
            } else {
                Err(RefineFlowError::OutputShape(
                    "final output object is missing a non-empty `result` property".to_string(),
                ))
            }
        }
        other => Err(RefineFlowError::OutputShape(format!(
            "final output must be an object with a `result` property, got {}",
            other
        ))),
    }
}

/// JS 语义的真值判断
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_output_becomes_empty_result() {
        let value = standardize_output(None).expect("standardize");
        assert_eq!(value, json!({ "result": "" }));
    }

    #[test]
    fn bare_string_is_rejected_mentioning_result() {
        let error = standardize_output(Some(json!("oops"))).unwrap_err();
        assert!(error.to_string().contains("result"));
    }

    #[test]
    fn empty_result_field_is_rejected() {
        assert!(standardize_output(Some(json!({ "result": "" }))).is_err());
        assert!(standardize_output(Some(json!({ "other": "x" }))).is_err());
    }

    #[test]
    fn extra_fields_are_preserved() {
        let value = standardize_output(Some(json!({ "result": "x", "notes": [1, 2] })))
            .expect("standardize");
        assert_eq!(value, json!({ "result": "x", "notes": [1, 2] }));
    }

    #[test]
    fn truthiness_follows_js_semantics() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }
}
