use thiserror::Error;

pub type Result<T> = std::result::Result<T, RefineFlowError>;

#[derive(Debug, Error)]
pub enum RefineFlowError {
    #[error("invalid workflow config: {0}")]
    Config(String),
    #[error("agent `{0}` is not defined in the workflow")]
    UnknownAgent(String),
    #[error("unknown step type `{0}`")]
    UnknownStepKind(String),
    #[error("flow output error: {0}")]
    OutputShape(String),
    #[error("no API key available; pass one explicitly or set REFINEFLOW_API_KEY / OPENAI_API_KEY")]
    MissingCredential,
    #[error("mcp server `{name}` connect failed: {reason}")]
    Connection { name: String, reason: String },
    #[error(transparent)]
    Schema(#[from] crate::schema::SchemaError),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
