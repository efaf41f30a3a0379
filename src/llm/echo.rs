use async_trait::async_trait;
use serde_json::json;

use crate::agent::Agent;
use crate::error::Result;
use crate::flow::{Message, MessageRole};

use super::invoker::{AgentInvoker, Invocation};

/// 本地回显后端，用于测试和干跑
#[derive(Default, Clone)]
pub struct LocalEchoInvoker;

#[async_trait]
impl AgentInvoker for LocalEchoInvoker {
    async fn invoke(&self, agent: &Agent, history: &[Message]) -> Result<Invocation> {
        let last_user = history
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.content.as_str())
            .unwrap_or_default();

        let output = json!({ "result": format!("[{}] {}", agent.name, last_user) });

        if let Err(error) = agent.output_validator.check(&output) {
            tracing::debug!(agent = %agent.id, %error, "echo output does not satisfy declared schema");
        }

        let mut next_history = history.to_vec();
        next_history.push(Message::assistant(output.to_string()));

        Ok(Invocation {
            output: Some(output),
            history: next_history,
        })
    }
}
