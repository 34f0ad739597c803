//! MCP stdio server exposing the HTTP bridge as a single `fetch` tool.
//!
//! Speaks newline-delimited JSON-RPC on stdin/stdout; logs go to stderr so
//! the protocol stream stays clean.

pub mod protocol;
pub mod server;

// Re-export commonly used types
pub use protocol::{
    McpContent, McpMessage, McpNotification, McpRequest, McpResponse, McpRpcError, McpTool,
    McpToolResult, RequestId, MCP_PROTOCOL_VERSION,
};
pub use server::BridgeServer;
