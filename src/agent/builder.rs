use std::collections::HashMap;
use std::sync::Arc;

use crate::config::WorkflowConfig;
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::error::{RefineFlowError, Result};
use crate::mcp::{McpHandle, McpRegistry};
use crate::schema::{translate, Validator};

use super::handle::{Agent, AgentTool};

pub type AgentRegistry = HashMap<String, Arc<Agent>>;

/// 两遍构建 Agent 注册表
///
/// 第一遍构建无工具的基础句柄；第二遍以基础句柄解析 agent 工具引用，
/// 重建最终句柄。agent 可以把另一个 agent 当作工具（DAG），被引用方
/// 必须以无工具形态先存在，这就是两遍的原因。
pub fn build_agents(
    config: &WorkflowConfig,
    servers: &McpRegistry,
    diagnostics: &Diagnostics,
) -> Result<AgentRegistry> {
    // schema 解析在构建任何 agent 之前完成，引用错误使整个构建失败。
    // 每个 schema 只翻译一次，引用同一 schema 的 agent 共享校验器。
    let mut schema_validators: HashMap<&str, Arc<Validator>> = HashMap::new();
    let mut validators: HashMap<&str, Arc<Validator>> = HashMap::new();
    for (id, spec) in &config.agents {
        let schema_ref = spec.output_schema_ref.as_deref().ok_or_else(|| {
            RefineFlowError::Config(format!("agent `{}` is missing `outputSchemaRef`", id))
        })?;
        let schema = config.output_schemas.get(schema_ref).ok_or_else(|| {
            RefineFlowError::Config(format!(
                "agent `{}` references unknown output schema `{}`",
                id, schema_ref
            ))
        })?;
        let validator = schema_validators
            .entry(schema_ref)
            .or_insert_with(|| Arc::new(translate(schema)))
            .clone();
        validators.insert(id.as_str(), validator);
    }

    // Pass 1: 基础句柄
    let mut base: AgentRegistry = AgentRegistry::new();
    for (id, spec) in &config.agents {
        let resolved_servers: Vec<McpHandle> = spec
            .mcp_server_refs
            .iter()
            .filter_map(|server_ref| match servers.get(server_ref) {
                Some(handle) => Some(handle.clone()),
                None => {
                    diagnostics.warn(
                        DiagnosticKind::UnknownServerRef,
                        format!(
                            "agent `{}` references unknown mcp server `{}`, dropped",
                            id, server_ref
                        ),
                    );
                    None
                }
            })
            .collect();

        let validator = validators
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| Arc::new(Validator::any()));

        base.insert(
            id.clone(),
            Arc::new(Agent {
                id: id.clone(),
                name: spec.name.clone().unwrap_or_else(|| id.clone()),
                instructions: spec.instructions.clone(),
                output_validator: validator,
                model_settings: spec.model_settings.clone(),
                servers: resolved_servers,
                tools: Vec::new(),
            }),
        );
    }

    // Pass 2: 解析工具引用，重建最终句柄
    let mut finals = AgentRegistry::new();
    for (id, spec) in &config.agents {
        let mut tools: Vec<AgentTool> = Vec::new();
        for tool in &spec.tools {
            match tool.kind.as_str() {
                "agent" => {
                    let Some(target_ref) = tool.target.as_deref() else {
                        diagnostics.warn(
                            DiagnosticKind::UnknownAgentToolRef,
                            format!("agent tool on `{}` has no `ref`, skipped", id),
                        );
                        continue;
                    };
                    match base.get(target_ref) {
                        Some(target) => tools.push(AgentTool {
                            name: tool
                                .id
                                .clone()
                                .unwrap_or_else(|| target_ref.to_string()),
                            target: Arc::clone(target),
                        }),
                        None => diagnostics.warn(
                            DiagnosticKind::UnknownAgentToolRef,
                            format!(
                                "agent `{}` references unknown agent tool `{}`, skipped",
                                id, target_ref
                            ),
                        ),
                    }
                }
                "function" => {
                    // 声明但未实现，不贡献可调用工具
                    diagnostics.warn(
                        DiagnosticKind::StubbedFunctionTool,
                        format!(
                            "agent `{}` declares function tool `{}`, not implemented",
                            id,
                            tool.id.as_deref().unwrap_or("<unnamed>")
                        ),
                    );
                }
                other => {
                    diagnostics.warn(
                        DiagnosticKind::UnknownToolKind,
                        format!("agent `{}` declares unknown tool kind `{}`, skipped", id, other),
                    );
                }
            }
        }

        let pass_one = base
            .get(id)
            .cloned()
            .ok_or_else(|| RefineFlowError::UnknownAgent(id.clone()))?;

        finals.insert(
            id.clone(),
            Arc::new(Agent {
                id: pass_one.id.clone(),
                name: pass_one.name.clone(),
                instructions: pass_one.instructions.clone(),
                output_validator: Arc::clone(&pass_one.output_validator),
                model_settings: pass_one.model_settings.clone(),
                servers: pass_one.servers.clone(),
                tools,
            }),
        );
    }

    Ok(finals)
}
