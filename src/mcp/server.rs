use crate::app::App;
use crate::config::Cli;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::aliases::canonical_tool_name;
use crate::mcp::catalog::{list_tools, validate_tool_args};
use crate::mcp::envelope::{build_error_envelope, build_result_envelope, text_content};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::services::logger::Logger;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "backup-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    app: Arc<App>,
    logger: Logger,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        let logger = app.logger.child("server");
        Self {
            app: Arc::new(app),
            logger,
        }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": list_tools() })
    }

    pub async fn handle_tools_call(&self, name: &str, raw_args: Value) -> Result<Value, McpError> {
        if !self.app.tool_executor.has_tool(name) {
            return Err(self.app.tool_executor.unknown_tool_error(name).into());
        }

        let args = if raw_args.is_null() {
            Value::Object(Default::default())
        } else {
            raw_args
        };
        let action = args
            .get("action")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let outcome: Result<Value, ToolError> =
            match validate_tool_args(canonical_tool_name(name), &args) {
                Ok(()) => self.app.tool_executor.execute(name, args).await,
                Err(err) => Err(err),
            };

        Ok(match outcome {
            Ok(payload) => text_content(&build_result_envelope(&payload), false),
            Err(err) => text_content(&build_error_envelope(name, action.as_deref(), &err), true),
        })
    }

    /// Handles one request; notifications yield no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") && request.is_notification() {
            return None;
        }
        let id = request.id.clone()?;
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.handle_tools_list()),
            "tools/call" => {
                let params = request.params.as_object().cloned().unwrap_or_default();
                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                if name.is_empty() {
                    let err = McpError::new(ErrorCode::InvalidParams, "Missing tool name");
                    return Some(error_response(id, err));
                }
                let args = params.get("arguments").cloned().unwrap_or(Value::Null);
                match self.handle_tools_call(name, args).await {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(err) => error_response(id, err),
                }
            }
            _ if request.method.starts_with("notifications/") => {
                JsonRpcResponse::success(id, serde_json::json!({}))
            }
            _ => error_response(id, McpError::from_code(ErrorCode::MethodNotFound)),
        };
        Some(response)
    }

    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let parsed: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(_) => {
                return Some(error_response(
                    Value::Null,
                    McpError::from_code(ErrorCode::ParseError),
                ))
            }
        };
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(parsed) {
            Ok(request) => self.handle_request(request).await,
            Err(_) => Some(error_response(
                id,
                McpError::from_code(ErrorCode::InvalidRequest),
            )),
        }
    }

    /// Newline-delimited JSON-RPC loop; requests are served one at a time.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = writer;

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(trimmed).await else {
                continue;
            };
            let payload = serde_json::to_string(&response)
                .map_err(|err| ToolError::internal(err.to_string()))?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        self.logger.info("stdin closed, shutting down", None);
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.serve(reader, writer).await
    }
}

fn error_response(id: Value, err: McpError) -> JsonRpcResponse {
    JsonRpcResponse::failure(id, err.code.as_i32(), err.message)
}

pub async fn run_stdio(cli: Cli) -> Result<(), ToolError> {
    let logger = Logger::with_level(SERVER_NAME, cli.log_level());
    let config = cli.client_config()?;
    logger.info(
        "starting",
        Some(&serde_json::json!({
            "version": SERVER_VERSION,
            "base_url": config.base_url(),
        })),
    );
    let app = App::initialize(config, logger.clone())?;
    let outcome = McpServer::new(app).run_stdio().await;
    if let Err(err) = &outcome {
        logger.error(
            "stdio loop failed",
            Some(&serde_json::json!({ "error": err.message })),
        );
    }
    outcome
}
