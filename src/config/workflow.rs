use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{RefineFlowError, Result};

pub const STEP_SINGLE_AGENT: &str = "single_agent";
pub const STEP_AGENT_REVIEWER: &str = "agent_reviewer";

/// 工作流配置根
///
/// `flow` 在反序列化层面是可选的，结构校验负责对缺失给出具名错误。
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    #[serde(default)]
    pub output_schemas: HashMap<String, Value>,
    #[serde(default)]
    pub agents: HashMap<String, AgentSpec>,
    #[serde(default)]
    pub mcp_servers: HashMap<String, ServerSpec>,
    #[serde(default)]
    pub flow: Option<FlowSpec>,
}

impl WorkflowConfig {
    /// 从 JSON Value 解析
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| RefineFlowError::Serialization(e.to_string()))
    }

    /// 从 JSON 字符串解析
    pub fn from_json(config: &str) -> Result<Self> {
        serde_json::from_str(config).map_err(|e| RefineFlowError::Serialization(e.to_string()))
    }

    pub fn steps(&self) -> &[StepSpec] {
        self.flow
            .as_ref()
            .map(|flow| flow.steps.as_slice())
            .unwrap_or(&[])
    }
}

/// 流程定义
#[derive(Debug, Deserialize, Clone)]
pub struct FlowSpec {
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// Agent 配置
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub output_schema_ref: Option<String>,
    /// 模型参数，原样透传给调用原语
    #[serde(default)]
    pub model_settings: Option<Value>,
    #[serde(default)]
    pub mcp_server_refs: Vec<String>,
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

/// Tool 声明
///
/// `kind` 保持原始字符串：未知类型在构建期降级为警告而不是解析失败。
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub kind: String,
    #[serde(default, rename = "ref")]
    pub target: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// 外部工具服务器配置
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// 步骤配置
///
/// `type` 保持原始字符串：未知的步骤类型必须在执行到该步骤时报出
/// 具名的致命错误，而不是在解析阶段被 serde 吞掉。
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub agent_ref: Option<String>,
    #[serde(default)]
    pub proposal_agent_ref: Option<String>,
    #[serde(default)]
    pub reviewer_agent_ref: Option<String>,
    #[serde(default)]
    pub pass_condition: Option<String>,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    #[serde(default)]
    pub feedback_injection: FeedbackInjection,
    #[serde(default)]
    pub io: StepIo,
}

fn default_max_turns() -> u32 {
    8
}

/// 评审反馈的注入方式
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackInjection {
    #[default]
    AsUser,
    AsSystem,
    AppendOnly,
}

/// 步骤的历史传递配置
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct StepIo {
    #[serde(default = "default_carry_history")]
    pub carry_history: bool,
}

impl Default for StepIo {
    fn default() -> Self {
        Self {
            carry_history: true,
        }
    }
}

fn default_carry_history() -> bool {
    true
}
