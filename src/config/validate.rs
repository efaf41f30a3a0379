use serde_json::Value;

use super::workflow::WorkflowConfig;
use crate::error::{RefineFlowError, Result};

/// 完整结构校验
///
/// 独立入口（CLI validate、系统预检）使用。引擎自身只检查
/// `validate_structure` 的不变量：零步骤的流程在引擎里是合法的，
/// 产出 `{"result": ""}`。
pub fn validate_config(config: &WorkflowConfig) -> Result<()> {
    let Some(flow) = &config.flow else {
        return Err(RefineFlowError::Config(
            "missing `flow` section".to_string(),
        ));
    };

    if flow.steps.is_empty() {
        return Err(RefineFlowError::Config(
            "`flow.steps` must not be empty".to_string(),
        ));
    }

    for step in &flow.steps {
        if step.max_turns == 0 {
            return Err(RefineFlowError::Config(format!(
                "step `{}`: `maxTurns` must be a positive integer",
                step.id
            )));
        }
    }

    validate_structure(config)
}

/// 数据模型不变量校验
///
/// 每个输出 schema 必须要求 `result` 字段；每个 agent 的
/// `outputSchemaRef` 必须可解析。错误信息指名违规实体。
pub fn validate_structure(config: &WorkflowConfig) -> Result<()> {
    for (name, schema) in &config.output_schemas {
        if !schema_requires_result(schema) {
            return Err(RefineFlowError::Config(format!(
                "output schema `{}` must declare a required `result` property",
                name
            )));
        }
    }

    for (id, agent) in &config.agents {
        match &agent.output_schema_ref {
            None => {
                return Err(RefineFlowError::Config(format!(
                    "agent `{}` is missing `outputSchemaRef`",
                    id
                )));
            }
            Some(schema_ref) if !config.output_schemas.contains_key(schema_ref) => {
                return Err(RefineFlowError::Config(format!(
                    "agent `{}` references unknown output schema `{}`",
                    id, schema_ref
                )));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn schema_requires_result(schema: &Value) -> bool {
    let has_result_property = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| properties.contains_key("result"))
        .unwrap_or(false);

    let result_is_required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|required| required.iter().any(|entry| entry == "result"))
        .unwrap_or(false);

    has_result_property && result_is_required
}
