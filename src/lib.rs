pub mod agent;
pub mod cli;
pub mod config;
pub mod diag;
pub mod error;
pub mod expr;
pub mod flow;
pub mod llm;
pub mod mcp;
pub mod schema;
pub mod upload;
pub mod utils;

pub use agent::{build_agents, Agent, AgentRegistry, AgentTool};
pub use config::{
    resolve_api_key, validate_config, validate_structure, AgentSpec, FeedbackInjection, FlowSpec,
    ServerSpec, StepIo, StepSpec, ToolSpec, WorkflowConfig,
};
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{RefineFlowError, Result};
pub use expr::{default_pass_condition, evaluate_condition, PassCondition, DEFAULT_PASS_CONDITION};
pub use flow::{
    execute_review, execute_single, standardize_output, ConversationHistory, FlowEngine, Message,
    MessageRole, ReviewOutcome, ReviewSettings, RunContext, SingleOutcome,
};
pub use llm::{AgentInvoker, DynAgentInvoker, Invocation, LocalEchoInvoker};
pub use mcp::{connect_servers, McpHandle, McpRegistry, StdioTransport};
pub use schema::{translate, SchemaError, Validator, ValidatorKind};
pub use upload::{FileStore, StagedFile};
#[cfg(feature = "upload-client")]
pub use upload::HttpFileStore;
pub use utils::{LoggingConfig, SystemValidator};
