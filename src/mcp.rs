//! Model Context Protocol surface: JSON-RPC types, the tool registry, and the stdio server.
//!
//! The protocol layer stays thin. Each `tools/call` is decoded into a typed [`ToolCall`] before
//! the client is touched, and every client failure is rendered as an `isError` tool result
//! instead of tearing the session down.

pub mod protocol;
pub mod server;
pub mod tools;

pub use protocol::*;
pub use server::*;
pub use tools::*;
