// MCP 模块 - 外部工具服务器注册表

mod registry;
mod stdio;

pub use registry::{connect_servers, McpHandle, McpRegistry};
pub use stdio::StdioTransport;
