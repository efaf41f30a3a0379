use std::env;

use crate::error::{RefineFlowError, Result};

pub const API_KEY_ENV: &str = "REFINEFLOW_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 解析 API 凭证
///
/// 优先级：
/// 1. 显式传入的值（`${VAR_NAME}` 格式时查对应环境变量）
/// 2. REFINEFLOW_API_KEY
/// 3. OPENAI_API_KEY
///
/// 纯函数：显式值覆盖环境值，但不写回任何进程级状态。
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String> {
    if let Some(value) = explicit {
        if let Some(var_name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
            return env::var(var_name).map_err(|_| RefineFlowError::MissingCredential);
        }
        if !value.is_empty() {
            return Ok(value.to_string());
        }
    }

    env::var(API_KEY_ENV)
        .or_else(|_| env::var(FALLBACK_API_KEY_ENV))
        .map_err(|_| RefineFlowError::MissingCredential)
}
