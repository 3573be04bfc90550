//! JSON-RPC 2.0 envelopes and the MCP message shapes used by the tool server.

// self
use crate::_prelude::*;

/// JSON-RPC version string carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";
/// MCP protocol revision announced when the client does not request one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Incoming JSON-RPC request or notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
	/// Protocol version; must be `"2.0"`.
	pub jsonrpc: String,
	/// Request id; absent for notifications.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Value>,
	/// Method name.
	pub method: String,
	/// Method parameters.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub params: Option<Value>,
}
impl JsonRpcRequest {
	/// Builds a request with the given id.
	pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
		Self { jsonrpc: JSONRPC_VERSION.into(), id: Some(id.into()), method: method.into(), params }
	}

	/// Returns `true` when no response is expected.
	pub fn is_notification(&self) -> bool {
		self.id.is_none()
	}
}

/// Outgoing JSON-RPC response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
	/// Protocol version; always `"2.0"`.
	pub jsonrpc: String,
	/// Id of the request being answered (`null` when it could not be read).
	pub id: Value,
	/// Result payload on success.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	/// Error payload on failure.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<JsonRpcError>,
}
impl JsonRpcResponse {
	/// Builds a success response.
	pub fn success(id: Value, result: Value) -> Self {
		Self { jsonrpc: JSONRPC_VERSION.into(), id, result: Some(result), error: None }
	}

	/// Builds an error response.
	pub fn failure(id: Value, error: JsonRpcError) -> Self {
		Self { jsonrpc: JSONRPC_VERSION.into(), id, result: None, error: Some(error) }
	}
}

/// JSON-RPC error object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
	/// Numeric error code.
	pub code: i64,
	/// Human-readable message.
	pub message: String,
	/// Optional structured details.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}
impl JsonRpcError {
	/// Invalid JSON was received.
	pub const PARSE_ERROR: i64 = -32700;
	/// The JSON sent is not a valid request object.
	pub const INVALID_REQUEST: i64 = -32600;
	/// The method does not exist.
	pub const METHOD_NOT_FOUND: i64 = -32601;
	/// Invalid method parameters.
	pub const INVALID_PARAMS: i64 = -32602;

	/// Builds an error without structured details.
	pub fn new(code: i64, message: impl Into<String>) -> Self {
		Self { code, message: message.into(), data: None }
	}
}

/// Name + version announced during `initialize`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
	/// Server name.
	pub name: String,
	/// Server version.
	pub version: String,
}
impl Default for ServerInfo {
	fn default() -> Self {
		Self { name: "mcp-server-wechat-mp".into(), version: env!("CARGO_PKG_VERSION").into() }
	}
}

/// Result of the `initialize` handshake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
	/// Negotiated protocol revision.
	pub protocol_version: String,
	/// Capabilities offered by the server.
	pub capabilities: Value,
	/// Server identity.
	pub server_info: ServerInfo,
}

/// Declaration of one callable tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
	/// Unique tool name.
	pub name: String,
	/// Human-readable description.
	pub description: String,
	/// JSON Schema for the arguments object.
	#[serde(rename = "inputSchema")]
	pub input_schema: Value,
}

/// Parameters of a `tools/call` request before argument decoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallParams {
	/// Tool name.
	pub name: String,
	/// Named arguments.
	#[serde(default)]
	pub arguments: Option<Value>,
}

/// Content block returned by a tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
	/// Plain text content.
	Text {
		/// Text payload.
		text: String,
	},
}

/// Result of a `tools/call` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
	/// Content blocks returned by the tool.
	pub content: Vec<ContentBlock>,
	/// Whether the tool execution failed.
	#[serde(default)]
	pub is_error: bool,
}
impl ToolCallResult {
	/// Creates a successful text result.
	pub fn text(text: impl Into<String>) -> Self {
		Self { content: vec![ContentBlock::Text { text: text.into() }], is_error: false }
	}

	/// Creates a successful result holding compact JSON.
	pub fn json(data: &Value) -> Self {
		Self::text(data.to_string())
	}

	/// Creates an error result rendered as `Error: <message>`.
	pub fn error(message: impl Display) -> Self {
		Self {
			content: vec![ContentBlock::Text { text: format!("Error: {message}") }],
			is_error: true,
		}
	}

	/// Returns the first text block, if any.
	pub fn first_text(&self) -> Option<&str> {
		self.content.iter().map(|ContentBlock::Text { text }| text.as_str()).next()
	}
}
