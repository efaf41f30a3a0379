use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ServerSpec;
use crate::diag::{DiagnosticKind, Diagnostics};
use crate::error::Result;

use super::stdio::StdioTransport;

/// 已连接的外部工具服务器句柄
#[derive(Clone)]
pub enum McpHandle {
    Stdio(Arc<StdioTransport>),
    /// http 服务器在构建期不建立连接，由调用原语按请求惰性访问
    Http { url: String },
}

impl std::fmt::Debug for McpHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("McpHandle").field(&self.describe()).finish()
    }
}

impl McpHandle {
    pub fn describe(&self) -> String {
        match self {
            McpHandle::Stdio(transport) => format!("stdio({})", transport.command_line()),
            McpHandle::Http { url } => format!("http({})", url),
        }
    }
}

pub type McpRegistry = HashMap<String, McpHandle>;

/// 连接所有声明的外部工具服务器
///
/// stdio 连接并发发起、一起等待，任何一个失败都使整个构建失败。
/// 未知的 `type` 跳过并记一条诊断。
pub async fn connect_servers(
    specs: &HashMap<String, ServerSpec>,
    diagnostics: &Diagnostics,
) -> Result<McpRegistry> {
    let mut registry = McpRegistry::new();
    let mut stdio_specs: Vec<(String, String, Vec<String>)> = Vec::new();

    for (id, spec) in specs {
        match spec.kind.as_str() {
            "stdio" => {
                let command = spec.command.clone().unwrap_or_default();
                stdio_specs.push((id.clone(), command, spec.args.clone()));
            }
            "http" => {
                let url = spec.url.clone().unwrap_or_default();
                registry.insert(id.clone(), McpHandle::Http { url });
            }
            other => {
                diagnostics.warn(
                    DiagnosticKind::UnknownServerType,
                    format!("mcp server `{}` has unknown type `{}`, skipped", id, other),
                );
            }
        }
    }

    let connects = stdio_specs.into_iter().map(|(id, command, args)| async move {
        let transport = StdioTransport::connect(&id, &command, &args).await?;
        Ok::<_, crate::error::RefineFlowError>((id, transport))
    });

    for (id, transport) in futures::future::try_join_all(connects).await? {
        registry.insert(id, McpHandle::Stdio(Arc::new(transport)));
    }

    Ok(registry)
}
