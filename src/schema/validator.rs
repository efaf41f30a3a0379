use std::collections::HashMap;

use super::error::SchemaError;

/// 校验器类型枚举
///
/// 从 JSON Schema 片段翻译而来的封闭变体类型，每个 schema 只翻译一次，
/// 缓存在 Agent 句柄上。
#[derive(Clone, Debug, PartialEq)]
pub enum ValidatorKind {
    String {
        enum_values: Option<Vec<String>>,
    },
    Number,
    Integer,
    Boolean,
    Array {
        items: Box<Validator>,
    },
    Object {
        fields: HashMap<String, Validator>,
        required: Vec<String>,
        additional: bool,
    },
    Any,
}

/// 运行时校验器
#[derive(Clone, Debug, PartialEq)]
pub struct Validator {
    pub kind: ValidatorKind,
}

impl Validator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self { kind }
    }

    /// 接受任意值的校验器
    pub fn any() -> Self {
        Self {
            kind: ValidatorKind::Any,
        }
    }

    pub fn check(&self, value: &serde_json::Value) -> Result<(), SchemaError> {
        super::validation::check_value(self, value, &mut Vec::new())
    }
}
