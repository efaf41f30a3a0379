use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::agent::Agent;
use crate::error::Result;
use crate::flow::Message;

/// 一次 agent 调用的结果
#[derive(Clone, Debug)]
pub struct Invocation {
    /// null，或符合该 agent 声明 schema 的结构化对象
    pub output: Option<Value>,
    /// 调用后的消息序列
    pub history: Vec<Message>,
}

/// LLM 调用原语
///
/// 核心引擎不实现模型调用、prompt 拼装或工具执行内部逻辑，
/// 只整形请求并解释响应。句柄上缓存的校验器供实现方约束输出。
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, agent: &Agent, history: &[Message]) -> Result<Invocation>;
}

pub type DynAgentInvoker = Arc<dyn AgentInvoker>;
