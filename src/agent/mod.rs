mod builder;
mod handle;

pub use builder::{build_agents, AgentRegistry};
pub use handle::{Agent, AgentTool};
