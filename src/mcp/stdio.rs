use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::sync::Mutex;

use crate::error::{RefineFlowError, Result};

/// stdio 传输的外部工具服务器
///
/// 连接即启动子进程并完成一次 initialize 握手。协议为行分隔的 JSON-RPC，
/// 请求串行发送（调用方并发时在 stdin/stdout 锁上排队）。
pub struct StdioTransport {
    name: String,
    command_line: String,
    child: Mutex<Child>,
    stdin: Mutex<ChildStdin>,
    stdout: Mutex<Lines<BufReader<ChildStdout>>>,
    next_id: AtomicU64,
}

impl StdioTransport {
    /// 启动子进程并发送 initialize 握手，等待响应
    pub async fn connect(name: &str, command: &str, args: &[String]) -> Result<Self> {
        let command_line = if args.is_empty() {
            command.to_string()
        } else {
            format!("{} {}", command, args.join(" "))
        };
        tracing::debug!(server = %name, command = %command_line, "connecting stdio mcp server");

        let mut child = tokio::process::Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RefineFlowError::Connection {
                name: name.to_string(),
                reason: format!("failed to spawn `{}`: {}", command_line, e),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| RefineFlowError::Connection {
            name: name.to_string(),
            reason: "no stdin on child process".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| RefineFlowError::Connection {
            name: name.to_string(),
            reason: "no stdout on child process".to_string(),
        })?;

        // stderr 后台排空，只进日志
        if let Some(stderr) = child.stderr.take() {
            let server = name.to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if !line.trim().is_empty() {
                        tracing::debug!(server = %server, "[stderr] {}", line);
                    }
                }
            });
        }

        let transport = Self {
            name: name.to_string(),
            command_line,
            child: Mutex::new(child),
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(BufReader::new(stdout).lines()),
            next_id: AtomicU64::new(1),
        };

        transport
            .request(
                "initialize",
                json!({
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            )
            .await?;

        Ok(transport)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// 发送一个 JSON-RPC 请求并等待响应
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let mut line = request.to_string();
        line.push('\n');

        {
            let mut stdin = self.stdin.lock().await;
            stdin
                .write_all(line.as_bytes())
                .await
                .map_err(|e| self.connection_error(format!("write failed: {}", e)))?;
            stdin
                .flush()
                .await
                .map_err(|e| self.connection_error(format!("flush failed: {}", e)))?;
        }

        let response_line = {
            let mut stdout = self.stdout.lock().await;
            stdout
                .next_line()
                .await
                .map_err(|e| self.connection_error(format!("read failed: {}", e)))?
                .ok_or_else(|| self.connection_error("server closed stdout".to_string()))?
        };

        let response: Value = serde_json::from_str(&response_line)
            .map_err(|e| self.connection_error(format!("invalid response: {}", e)))?;

        if let Some(error) = response.get("error") {
            return Err(self.connection_error(format!("`{}` rejected: {}", method, error)));
        }

        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    /// 终止子进程
    pub async fn shutdown(&self) {
        let mut child = self.child.lock().await;
        if let Err(e) = child.kill().await {
            tracing::debug!(server = %self.name, "kill failed: {}", e);
        }
    }

    fn connection_error(&self, reason: String) -> RefineFlowError {
        RefineFlowError::Connection {
            name: self.name.clone(),
            reason,
        }
    }
}
