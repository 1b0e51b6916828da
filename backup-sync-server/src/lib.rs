//! Coordinator and tool-call surface for backup-sync.
//!
//! [`Coordinator`] turns a named tool call into a [`ToolResult`]; nothing
//! below it escapes as an error. [`runtime`] serves those calls as
//! newline-delimited JSON-RPC over stdio.

pub mod coordinator;
mod error;
pub mod protocol;
pub mod runtime;
pub mod tools;

pub use coordinator::Coordinator;
pub use error::ServerError;
pub use protocol::{Content, RpcRequest, RpcResponse, ToolCall, ToolResult};
pub use runtime::{init_tracing, serve, serve_stdio};
pub use tools::{tool_definitions, Tool, ToolDefinition};
