use crate::config::{resolve_api_key, validate_config, ServerSpec, WorkflowConfig};
use crate::error::{RefineFlowError, Result};

/// 系统预检验证器
///
/// 执行前的独立门禁，与工作流构建期的宽容路径刻意分离：
/// 构建期对坏的 server 配置只降级警告，这里硬失败。
pub struct SystemValidator;

impl SystemValidator {
    /// 验证凭证、结构不变量和所有 server 配置
    pub fn validate_system(config: &WorkflowConfig, api_key: Option<&str>) -> Result<()> {
        resolve_api_key(api_key)?;
        validate_config(config)?;
        for (id, spec) in &config.mcp_servers {
            Self::validate_server(id, spec)?;
        }
        Ok(())
    }

    /// 验证单个 server 配置
    pub fn validate_server(id: &str, spec: &ServerSpec) -> Result<()> {
        match spec.kind.as_str() {
            "stdio" => {
                let has_command = spec
                    .command
                    .as_deref()
                    .map(|command| !command.is_empty())
                    .unwrap_or(false);
                if !has_command {
                    return Err(RefineFlowError::Config(format!(
                        "stdio mcp server `{}` is missing `command`",
                        id
                    )));
                }
            }
            "http" => {
                let url = spec.url.as_deref().unwrap_or_default();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(RefineFlowError::Config(format!(
                        "http mcp server `{}` needs a url starting with http:// or https://",
                        id
                    )));
                }
            }
            other => {
                return Err(RefineFlowError::Config(format!(
                    "mcp server `{}` has unsupported type `{}`",
                    id, other
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerSpec;

    fn stdio_spec(command: Option<&str>) -> ServerSpec {
        ServerSpec {
            kind: "stdio".to_string(),
            command: command.map(str::to_string),
            args: Vec::new(),
            url: None,
        }
    }

    fn http_spec(url: Option<&str>) -> ServerSpec {
        ServerSpec {
            kind: "http".to_string(),
            command: None,
            args: Vec::new(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn stdio_requires_command() {
        assert!(SystemValidator::validate_server("fs", &stdio_spec(Some("mcp-fs"))).is_ok());
        assert!(SystemValidator::validate_server("fs", &stdio_spec(None)).is_err());
        assert!(SystemValidator::validate_server("fs", &stdio_spec(Some(""))).is_err());
    }

    #[test]
    fn http_requires_http_url() {
        assert!(SystemValidator::validate_server("api", &http_spec(Some("https://example.com"))).is_ok());
        assert!(SystemValidator::validate_server("api", &http_spec(Some("example.com"))).is_err());
        assert!(SystemValidator::validate_server("api", &http_spec(None)).is_err());
    }

    #[test]
    fn unknown_type_fails_hard_here() {
        let spec = ServerSpec {
            kind: "websocket".to_string(),
            command: None,
            args: Vec::new(),
            url: None,
        };
        assert!(SystemValidator::validate_server("ws", &spec).is_err());
    }
}
