use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::WorkflowConfig;
use crate::error::{RefineFlowError, Result};
use crate::flow::{FlowEngine, RunContext};
use crate::llm::LocalEchoInvoker;
use crate::utils::SystemValidator;

/// 从文件加载工作流配置
pub fn load_workflow_file(path: &Path) -> Result<WorkflowConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        RefineFlowError::Config(format!("cannot read `{}`: {}", path.display(), e))
    })?;
    WorkflowConfig::from_json(&content)
}

/// 用本地回显后端干跑一个工作流文件
pub async fn run_workflow_file(
    path: &Path,
    prompt: &str,
    api_key: Option<String>,
) -> Result<Value> {
    let config = load_workflow_file(path)?;
    let ctx = RunContext { api_key };
    let engine = FlowEngine::new(Arc::new(LocalEchoInvoker));
    let output = engine.run(&config, &ctx, prompt).await?;

    for diagnostic in engine.diagnostics().snapshot() {
        eprintln!("warning: {}", diagnostic.message);
    }

    Ok(output)
}

/// 预检一个工作流文件
pub fn validate_workflow_file(path: &Path, api_key: Option<String>) -> Result<()> {
    let config = load_workflow_file(path)?;
    SystemValidator::validate_system(&config, api_key.as_deref())
}
