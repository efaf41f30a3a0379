mod echo;
mod invoker;

pub use echo::LocalEchoInvoker;
pub use invoker::{AgentInvoker, DynAgentInvoker, Invocation};
