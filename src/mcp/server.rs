//! MCP request handling and the newline-delimited stdio transport.

// std
use std::io::Error as IoError;
// crates.io
use tokio::{
	io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
	sync::mpsc,
};
// self
use crate::{
	_prelude::*,
	client::MpClient,
	http::ApiHttpClient,
	mcp::{
		protocol::{
			InitializeResult, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
			PROTOCOL_VERSION, ServerInfo, ToolCallParams, ToolCallResult,
		},
		tools::{self, ToolCall},
	},
	obs::event,
};

/// Tool server wrapping one [`MpClient`].
pub struct McpServer<C>
where
	C: ?Sized + ApiHttpClient,
{
	client: MpClient<C>,
	info: ServerInfo,
}
impl<C> McpServer<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a server announcing the default [`ServerInfo`].
	pub fn new(client: MpClient<C>) -> Self {
		Self { client, info: ServerInfo::default() }
	}

	/// Handles one raw line; returns the response to write, if any.
	///
	/// Bytes that are not a JSON-RPC request, invalid UTF-8 included, produce a parse error.
	pub async fn handle_line(&self, line: &[u8]) -> Option<JsonRpcResponse> {
		match serde_json::from_slice::<JsonRpcRequest>(line) {
			Ok(request) => self.handle(request).await,
			Err(e) => Some(JsonRpcResponse::failure(
				Value::Null,
				JsonRpcError::new(JsonRpcError::PARSE_ERROR, format!("Parse error: {e}.")),
			)),
		}
	}

	/// Handles one request; notifications produce no response.
	pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
		let JsonRpcRequest { jsonrpc, id, method, params } = request;
		let Some(id) = id else {
			event!(debug, method = %method, "Ignoring notification.");

			return None;
		};

		if jsonrpc != JSONRPC_VERSION {
			return Some(JsonRpcResponse::failure(
				id,
				JsonRpcError::new(JsonRpcError::INVALID_REQUEST, "Unsupported jsonrpc version."),
			));
		}

		let outcome = match method.as_str() {
			"initialize" => Ok(self.initialize(params)),
			"ping" => Ok(json!({})),
			"tools/list" => Ok(json!({ "tools": tools::tool_definitions() })),
			"tools/call" => self.call_tool(params).await,
			other => Err(JsonRpcError::new(
				JsonRpcError::METHOD_NOT_FOUND,
				format!("Method not found: {other}."),
			)),
		};

		Some(match outcome {
			Ok(result) => JsonRpcResponse::success(id, result),
			Err(error) => JsonRpcResponse::failure(id, error),
		})
	}

	fn initialize(&self, params: Option<Value>) -> Value {
		let protocol_version = params
			.as_ref()
			.and_then(|params| params.get("protocolVersion"))
			.and_then(Value::as_str)
			.unwrap_or(PROTOCOL_VERSION)
			.to_owned();
		let result = InitializeResult {
			protocol_version,
			capabilities: json!({ "tools": {} }),
			server_info: self.info.clone(),
		};

		json!(result)
	}

	async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
		let params: ToolCallParams = params
			.ok_or_else(|| JsonRpcError::new(JsonRpcError::INVALID_PARAMS, "Missing params."))
			.and_then(|params| {
				serde_json::from_value(params).map_err(|e| {
					JsonRpcError::new(JsonRpcError::INVALID_PARAMS, format!("Invalid params: {e}."))
				})
			})?;
		let result = match ToolCall::decode(&params.name, params.arguments) {
			Ok(call) => match call.invoke(&self.client).await {
				Ok(payload) => ToolCallResult::json(&payload),
				Err(e) => ToolCallResult::error(e),
			},
			Err(e) => ToolCallResult::error(e),
		};

		Ok(json!(result))
	}
}
impl<C> McpServer<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Serves newline-delimited JSON-RPC from `reader` to `writer` until EOF.
	///
	/// Each request runs in its own task, so responses may be written out of order. A malformed
	/// line is answered with a parse error and the session continues; only I/O failures end it.
	/// The writer is drained of every in-flight response before this returns.
	pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<(), IoError>
	where
		R: AsyncRead + Unpin,
		W: AsyncWrite + Unpin + Send + 'static,
	{
		let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
		let writer_task = tokio::spawn(async move {
			let mut writer = writer;

			while let Some(response) = rx.recv().await {
				let mut line = serde_json::to_vec(&response)?;

				line.push(b'\n');
				writer.write_all(&line).await?;
				writer.flush().await?;
			}

			Ok::<_, IoError>(())
		});
		let mut reader = BufReader::new(reader);

		loop {
			let mut line = Vec::new();

			if reader.read_until(b'\n', &mut line).await? == 0 {
				break;
			}
			if line.trim_ascii().is_empty() {
				continue;
			}

			let server = self.clone();
			let tx = tx.clone();

			tokio::spawn(async move {
				if let Some(response) = server.handle_line(&line).await {
					// The writer only goes away after every sender is dropped.
					let _ = tx.send(response);
				}
			});
		}

		drop(tx);

		writer_task.await.map_err(IoError::other)?
	}

	/// Serves the process's stdin/stdout.
	pub async fn serve_stdio(self: Arc<Self>) -> Result<(), IoError> {
		self.serve(tokio::io::stdin(), tokio::io::stdout()).await
	}
}
impl<C> Debug for McpServer<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("McpServer").field("info", &self.info).field("client", &self.client).finish()
	}
}
