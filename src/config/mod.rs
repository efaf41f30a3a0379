pub mod env;
pub mod validate;
pub mod workflow;

pub use env::resolve_api_key;
pub use validate::{validate_config, validate_structure};
pub use workflow::{
    AgentSpec, FeedbackInjection, FlowSpec, ServerSpec, StepIo, StepSpec, ToolSpec, WorkflowConfig,
    STEP_AGENT_REVIEWER, STEP_SINGLE_AGENT,
};
