use thiserror::Error;

/// Schema 错误类型
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("output schema `{0}` is not defined in outputSchemas")]
    NotDefined(String),
    #[error("schema validation failed: {message}")]
    Validation { message: String, path: Vec<String> },
}
