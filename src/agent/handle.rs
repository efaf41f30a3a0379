use std::sync::Arc;

use serde_json::Value;

use crate::mcp::McpHandle;
use crate::schema::Validator;

/// 已构建的 Agent 句柄
///
/// 不可变：两遍构建产出两个索引集合（基础句柄、最终句柄），
/// 从不在原地修改句柄。
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub instructions: String,
    /// 输出 schema 翻译后的校验器，每个 schema 只翻译一次
    pub output_validator: Arc<Validator>,
    /// 模型参数，原样透传给调用原语
    pub model_settings: Option<Value>,
    pub servers: Vec<McpHandle>,
    pub tools: Vec<AgentTool>,
}

/// 包装为可调用工具的 Agent
///
/// target 指向被引用 agent 的第一遍（无工具）基础句柄。
#[derive(Clone, Debug)]
pub struct AgentTool {
    pub name: String,
    pub target: Arc<Agent>,
}
