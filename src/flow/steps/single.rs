use serde_json::Value;

use crate::agent::Agent;
use crate::error::Result;
use crate::flow::history::Message;
use crate::llm::AgentInvoker;

/// 单 agent 步骤的执行结果
pub struct SingleOutcome {
    pub output: Option<Value>,
    pub next_history: Vec<Message>,
}

/// 执行单 agent 步骤
///
/// 调用一次，无重试，失败向上传播。carry_history 为 false 时
/// 本轮交互不进入历史，下一步看到的历史与本步骤输入完全一致。
pub async fn execute_single(
    invoker: &dyn AgentInvoker,
    agent: &Agent,
    history: Vec<Message>,
    carry_history: bool,
) -> Result<SingleOutcome> {
    let invocation = invoker.invoke(agent, &history).await?;
    let next_history = if carry_history {
        invocation.history
    } else {
        history
    };
    Ok(SingleOutcome {
        output: invocation.output,
        next_history,
    })
}
