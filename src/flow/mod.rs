// Flow 模块 - 步骤执行与输出标准化

pub mod engine;
pub mod history;
pub mod output;
pub mod steps;

pub use engine::{FlowEngine, RunContext};
pub use history::{ConversationHistory, Message, MessageRole};
pub use output::{is_truthy, standardize_output};
pub use steps::{execute_review, execute_single, ReviewOutcome, ReviewSettings, SingleOutcome};
