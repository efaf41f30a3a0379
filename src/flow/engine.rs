use std::sync::Arc;

use serde_json::{json, Value};

use crate::agent::{build_agents, Agent, AgentRegistry};
use crate::config::{
    resolve_api_key, validate_structure, StepSpec, WorkflowConfig, STEP_AGENT_REVIEWER,
    STEP_SINGLE_AGENT,
};
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::error::{RefineFlowError, Result};
use crate::expr::{default_pass_condition, PassCondition};
use crate::llm::DynAgentInvoker;
use crate::mcp::connect_servers;
use crate::upload::{FileStore, StagedFile};

use super::history::Message;
use super::output::standardize_output;
use super::steps::{execute_review, execute_single, ReviewSettings};

/// 一次流程调用的上下文
///
/// 凭证是显式传入的配置值：显式值覆盖环境值，解析是输入的纯函数，
/// 不修改任何进程级状态。
#[derive(Clone, Default)]
pub struct RunContext {
    pub api_key: Option<String>,
}

impl RunContext {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }
}

/// 流程引擎
///
/// 驱动有序的步骤列表，在步骤之间传递会话历史和当前输出，
/// 收尾时做一次输出标准化。每次 run 构建自己的 agent/server 注册表，
/// 独立的流程调用之间没有共享可变状态。
#[derive(Clone)]
pub struct FlowEngine {
    invoker: DynAgentInvoker,
    diagnostics: Diagnostics,
}

impl FlowEngine {
    pub fn new(invoker: DynAgentInvoker) -> Self {
        Self {
            invoker,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// 执行流程
    pub async fn run(
        &self,
        config: &WorkflowConfig,
        ctx: &RunContext,
        prompt: &str,
    ) -> Result<Value> {
        self.run_seeded(config, ctx, vec![Message::user(prompt)])
            .await
    }

    /// 执行带附件的流程
    ///
    /// 暂存的产物引用作为结构化内容挂在种子消息的 metadata 上。
    /// 运行后的删除是尽力而为：失败记入诊断，不影响流程结果。
    pub async fn run_with_attachment(
        &self,
        config: &WorkflowConfig,
        ctx: &RunContext,
        prompt: &str,
        store: &dyn FileStore,
        staged: &StagedFile,
    ) -> Result<Value> {
        let seed = Message::user(prompt).with_metadata(json!({
            "attachment": { "id": staged.id, "filename": staged.filename }
        }));
        let result = self.run_seeded(config, ctx, vec![seed]).await;

        if let Err(error) = store.delete(&staged.id).await {
            self.diagnostics.warn(
                DiagnosticKind::UploadCleanup,
                format!("failed to delete staged file `{}`: {}", staged.id, error),
            );
        }

        result
    }

    async fn run_seeded(
        &self,
        config: &WorkflowConfig,
        ctx: &RunContext,
        seed: Vec<Message>,
    ) -> Result<Value> {
        // 凭证在最早的入口点检查
        let _api_key = resolve_api_key(ctx.api_key.as_deref())?;

        // 数据模型不变量先于任何 agent/server 构建；零步骤的流程
        // 在这里是合法的，直接走收尾标准化
        validate_structure(config)?;

        let servers = connect_servers(&config.mcp_servers, &self.diagnostics).await?;
        let agents = build_agents(config, &servers, &self.diagnostics)?;

        let mut history = seed;
        let mut output: Option<Value> = None;

        for step in config.steps() {
            tracing::debug!(step = %step.id, kind = %step.kind, "executing step");
            match step.kind.as_str() {
                STEP_SINGLE_AGENT => {
                    let agent = resolve_agent(&agents, step.agent_ref.as_deref(), step, "agentRef")?;
                    let outcome = execute_single(
                        self.invoker.as_ref(),
                        &agent,
                        history,
                        step.io.carry_history,
                    )
                    .await?;
                    output = outcome.output;
                    history = outcome.next_history;
                }
                STEP_AGENT_REVIEWER => {
                    let proposal_agent = resolve_agent(
                        &agents,
                        step.proposal_agent_ref.as_deref(),
                        step,
                        "proposalAgentRef",
                    )?;
                    let reviewer_agent = resolve_agent(
                        &agents,
                        step.reviewer_agent_ref.as_deref(),
                        step,
                        "reviewerAgentRef",
                    )?;
                    let settings = ReviewSettings {
                        pass_condition: compile_pass_condition(step),
                        max_turns: step.max_turns,
                        feedback_injection: step.feedback_injection,
                        carry_history: step.io.carry_history,
                    };
                    let outcome = execute_review(
                        self.invoker.as_ref(),
                        &proposal_agent,
                        &reviewer_agent,
                        history,
                        settings,
                    )
                    .await?;
                    // 评审未通过不中止流程，总是继续下一步
                    output = outcome.output;
                    history = outcome.next_history;
                }
                other => {
                    return Err(RefineFlowError::UnknownStepKind(other.to_string()));
                }
            }
        }

        standardize_output(output)
    }
}

// 条件每个 step 编译一次，默认条件进程级只编译一次
fn compile_pass_condition(step: &StepSpec) -> PassCondition {
    match step.pass_condition.as_deref() {
        Some(source) => PassCondition::compile(source),
        None => default_pass_condition().clone(),
    }
}

fn resolve_agent(
    agents: &AgentRegistry,
    agent_ref: Option<&str>,
    step: &StepSpec,
    field: &str,
) -> Result<Arc<Agent>> {
    let agent_ref = agent_ref.ok_or_else(|| {
        RefineFlowError::Config(format!("step `{}` is missing `{}`", step.id, field))
    })?;
    agents
        .get(agent_ref)
        .cloned()
        .ok_or_else(|| RefineFlowError::UnknownAgent(agent_ref.to_string()))
}
