use crate::errors::ToolError;
use serde_json::Value;

/// Success envelope around a handler result.
pub fn build_result_envelope(payload: &Value) -> Value {
    let meta = payload.get("meta");
    let field = |key: &str| meta.and_then(|m| m.get(key)).cloned().unwrap_or(Value::Null);
    let tool = meta
        .and_then(|m| m.get("invoked_as").filter(|v| v.is_string()))
        .cloned()
        .unwrap_or_else(|| field("tool"));
    serde_json::json!({
        "success": true,
        "tool": tool,
        "action": field("action"),
        "result": payload.get("result").cloned().unwrap_or(Value::Null),
        "duration_ms": field("duration_ms"),
        "trace": { "trace_id": field("trace_id") },
    })
}

/// Error envelope; the message is carried verbatim.
pub fn build_error_envelope(tool: &str, action: Option<&str>, error: &ToolError) -> Value {
    serde_json::json!({
        "success": false,
        "tool": tool,
        "action": action,
        "error": error,
    })
}

/// MCP `tools/call` result with a single text block.
pub fn text_content(envelope: &Value, is_error: bool) -> Value {
    let text = serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string());
    let mut out = serde_json::json!({
        "content": [ { "type": "text", "text": text } ]
    });
    if is_error {
        out["isError"] = Value::Bool(true);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_envelope_prefers_invoked_alias() {
        let payload = json!({
            "ok": true,
            "result": [1, 2],
            "meta": {"tool": "mcp_backups", "invoked_as": "backups", "action": "list", "trace_id": "t", "duration_ms": 3}
        });
        let envelope = build_result_envelope(&payload);
        assert_eq!(envelope["tool"], json!("backups"));
        assert_eq!(envelope["result"], json!([1, 2]));
        assert_eq!(envelope["trace"]["trace_id"], json!("t"));
    }

    #[test]
    fn error_content_sets_flag() {
        let err = ToolError::not_found("Database not found");
        let content = text_content(&build_error_envelope("mcp_databases", Some("get"), &err), true);
        assert_eq!(content["isError"], json!(true));
        let text = content["content"][0]["text"].as_str().unwrap_or_default();
        assert!(text.contains("Database not found"));
        assert_eq!(content["content"][0]["type"], json!("text"));
    }
}
