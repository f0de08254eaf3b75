use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::limits::LOG_TEXT_MAX_BYTES;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::utils::redact::redact_text;
use crate::utils::suggest::suggest;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

/// Routes tool calls to handlers and attaches timing and trace metadata.
#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
    alias_map: HashMap<String, String>,
}

impl ToolExecutor {
    pub fn new(
        logger: Logger,
        handlers: HashMap<String, Arc<dyn ToolHandler>>,
        alias_map: HashMap<String, String>,
    ) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
            alias_map,
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool) || self.alias_map.contains_key(tool)
    }

    fn resolve_alias<'a>(&'a self, tool: &'a str) -> (&'a str, Option<&'a str>) {
        if self.handlers.contains_key(tool) {
            return (tool, None);
        }
        match self.alias_map.get(tool) {
            Some(mapped) => (mapped.as_str(), Some(tool)),
            None => (tool, None),
        }
    }

    fn strip_args_for_handler(args: &Value) -> Value {
        let mut cleaned = args.clone();
        if let Value::Object(map) = &mut cleaned {
            map.remove("trace_id");
        }
        cleaned
    }

    pub fn unknown_tool_error(&self, tool: &str) -> ToolError {
        let candidates: Vec<String> = self
            .handlers
            .keys()
            .cloned()
            .chain(self.alias_map.keys().cloned())
            .collect();
        let suggestions = suggest(tool, &candidates, 3);
        let hint = if suggestions.is_empty() {
            "Call tools/list to see the available tools".to_string()
        } else {
            format!("Did you mean: {}", suggestions.join(", "))
        };
        ToolError::not_found(format!("Unknown tool: {}", tool)).with_hint(hint)
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let started_at = chrono::Utc::now().timestamp_millis();
        let (resolved_tool, invoked_as) = self.resolve_alias(tool);
        let Some(handler) = self.handlers.get(resolved_tool) else {
            return Err(self.unknown_tool_error(tool));
        };
        let trace_id = args
            .get("trace_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let action = args.get("action").cloned().unwrap_or(Value::Null);

        self.logger.debug(
            "tool call",
            Some(&serde_json::json!({
                "tool": resolved_tool,
                "action": action,
                "trace_id": trace_id,
            })),
        );

        let result = handler.handle(Self::strip_args_for_handler(&args)).await;
        let duration_ms = chrono::Utc::now().timestamp_millis() - started_at;

        let result = match result {
            Ok(value) => value,
            Err(err) => {
                self.logger.warn(
                    "tool call failed",
                    Some(&serde_json::json!({
                        "tool": resolved_tool,
                        "action": action,
                        "trace_id": trace_id,
                        "code": err.code,
                        "message": redact_text(&err.message, LOG_TEXT_MAX_BYTES),
                        "duration_ms": duration_ms,
                    })),
                );
                return Err(err);
            }
        };

        Ok(serde_json::json!({
            "ok": true,
            "result": result,
            "meta": {
                "tool": resolved_tool,
                "invoked_as": invoked_as,
                "action": action,
                "trace_id": trace_id,
                "duration_ms": duration_ms,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::logger::LogLevel;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, args: Value) -> Result<Value, ToolError> {
            Ok(args)
        }
    }

    fn executor() -> ToolExecutor {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("mcp_echo".to_string(), Arc::new(Echo));
        let aliases = HashMap::from([("echo".to_string(), "mcp_echo".to_string())]);
        ToolExecutor::new(Logger::with_level("test", LogLevel::Error), handlers, aliases)
    }

    #[tokio::test]
    async fn execute_resolves_alias_and_strips_trace_id() {
        let payload = executor()
            .execute("echo", serde_json::json!({"action": "x", "trace_id": "t-1"}))
            .await
            .expect("payload");
        assert_eq!(payload["result"], serde_json::json!({"action": "x"}));
        assert_eq!(payload["meta"]["tool"], "mcp_echo");
        assert_eq!(payload["meta"]["invoked_as"], "echo");
        assert_eq!(payload["meta"]["trace_id"], "t-1");
    }

    #[tokio::test]
    async fn unknown_tool_suggests_close_names() {
        let err = executor()
            .execute("ech", serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unknown tool: ech");
        assert!(err.hint.unwrap_or_default().contains("echo"));
    }
}
