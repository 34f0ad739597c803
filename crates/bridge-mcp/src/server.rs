//! Request dispatch and the stdio serve loop.
//!
//! One `fetch` tool over newline-delimited JSON-RPC. Pipeline failures are
//! delivered inside the tool result with `isError` set; they are normal
//! JSON-RPC responses, never RPC-level errors. RPC errors are reserved for
//! protocol faults (unknown method, unknown tool, unparseable message).

use bridge_core::{
    BridgeConfig, FetchError, FetchOutcome, FetchParams, FetchResult, HttpBridge, HttpMethod,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::protocol::{
    methods, InitializeResult, McpCapabilities, McpContent, McpMessage, McpNotification,
    McpRequest, McpResponse, McpRpcError, McpServerInfo, McpTool, McpToolResult, RequestId,
    ToolCapabilities, MCP_PROTOCOL_VERSION,
};

/// Server name reported during initialization.
pub const SERVER_NAME: &str = "http-bridge";

/// Name of the single exposed tool.
pub const FETCH_TOOL: &str = "fetch";

/// MCP server over one [`HttpBridge`].
pub struct BridgeServer {
    bridge: HttpBridge,
}

impl BridgeServer {
    pub fn new(bridge: HttpBridge) -> Self {
        Self { bridge }
    }

    /// Build the server straight from static configuration.
    pub fn from_config(config: &BridgeConfig) -> FetchResult<Self> {
        Ok(Self::new(HttpBridge::new(config)?))
    }

    /// The `fetch` tool definition with its parameter schema.
    pub fn fetch_tool() -> McpTool {
        McpTool::new(FETCH_TOOL)
            .with_description(
                "Make an HTTP request to a URL on the local network. \
                 Only domains in the allowlist can be accessed.",
            )
            .with_input_schema(json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "Target URL (must match the domain allowlist)"
                    },
                    "method": {
                        "type": "string",
                        "description": "HTTP method",
                        "enum": HttpMethod::NAMES,
                        "default": "GET"
                    },
                    "headers": {
                        "type": "object",
                        "description": "Extra request headers",
                        "additionalProperties": {"type": "string"}
                    },
                    "body": {
                        "type": "string",
                        "description": "Request body, sent as UTF-8"
                    },
                    "verify_tls": {
                        "type": "boolean",
                        "description": "Verify TLS certificates (disable for self-signed certs)",
                        "default": true
                    },
                    "timeout_secs": {
                        "type": "number",
                        "description": "Request timeout in seconds (max: 300)",
                        "default": 30.0
                    },
                    "follow_redirects": {
                        "type": "boolean",
                        "description": "Follow HTTP redirects",
                        "default": true
                    }
                },
                "required": ["url"]
            }))
    }

    /// Serve newline-delimited JSON-RPC until the reader closes.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(line).await {
                let json = serde_json::to_string(&response).map_err(std::io::Error::other)?;
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one inbound line; `None` means nothing is written back.
    ///
    /// Unparseable input gets a parse error with a null id. Valid JSON that
    /// is not a JSON-RPC message gets an invalid-request error, echoing the
    /// id when one can be recovered from the payload.
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse message: {e}");
                return Some(McpResponse::error(RequestId::Null, McpRpcError::parse_error()));
            }
        };

        match McpMessage::deserialize(&value) {
            Ok(McpMessage::Request(request)) => Some(self.handle_request(request).await),
            Ok(McpMessage::Notification(notification)) => {
                self.handle_notification(&notification);
                None
            }
            Ok(McpMessage::Response(_)) => {
                warn!("Ignoring unexpected response message");
                None
            }
            Err(e) => {
                warn!("Not a JSON-RPC message: {e}");
                let id = value
                    .get("id")
                    .and_then(|id| RequestId::deserialize(id).ok())
                    .unwrap_or(RequestId::Null);
                Some(McpResponse::error(id, McpRpcError::invalid_request()))
            }
        }
    }

    /// Dispatch a request to its handler.
    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        debug!("Handling {} (id {})", request.method, request.id);
        match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(request.id, request.params),
            methods::PING => McpResponse::success(request.id, json!({})),
            methods::TOOLS_LIST => {
                McpResponse::success(request.id, json!({"tools": [Self::fetch_tool()]}))
            }
            methods::TOOLS_CALL => self.handle_tool_call(request.id, request.params).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                McpResponse::error(request.id, McpRpcError::method_not_found())
            }
        }
    }

    fn handle_notification(&self, notification: &McpNotification) {
        if notification.method == methods::INITIALIZED {
            info!("Client initialization complete");
        } else {
            debug!("Ignoring notification: {}", notification.method);
        }
    }

    fn handle_initialize(&self, id: RequestId, params: Option<Value>) -> McpResponse {
        let client = params
            .as_ref()
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!("Client connected: {client}");

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: McpCapabilities {
                tools: Some(ToolCapabilities::default()),
            },
            server_info: McpServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        match serde_json::to_value(result) {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => McpResponse::error(
                id,
                McpRpcError::internal_error().with_data(json!(e.to_string())),
            ),
        }
    }

    async fn handle_tool_call(&self, id: RequestId, params: Option<Value>) -> McpResponse {
        let params = params.unwrap_or(Value::Null);
        let tool = params.get("name").and_then(Value::as_str).unwrap_or_default();
        if tool != FETCH_TOOL {
            return McpResponse::error(
                id,
                McpRpcError::invalid_params().with_data(json!(format!("Unknown tool: {tool}"))),
            );
        }

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        let outcome = match serde_json::from_value::<FetchParams>(arguments) {
            Ok(fetch_params) => self.bridge.fetch(fetch_params).await,
            // Malformed arguments are a validation failure in the tool
            // envelope, not an RPC-level fault.
            Err(e) => FetchOutcome::from_error(&FetchError::InvalidParams(e.to_string())),
        };

        Self::outcome_response(id, &outcome)
    }

    fn outcome_response(id: RequestId, outcome: &FetchOutcome) -> McpResponse {
        let result = McpToolResult {
            content: vec![McpContent::text(outcome.to_json().to_string())],
            is_error: !outcome.is_success(),
        };
        match serde_json::to_value(result) {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => McpResponse::error(
                id,
                McpRpcError::internal_error().with_data(json!(e.to_string())),
            ),
        }
    }
}
