mod common;
use common::{app_with, ScriptedTransport, BASE_URL};

use backup_mcp::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use backup_mcp::mcp::server::McpServer;
use serde_json::{json, Value};
use std::collections::HashSet;

fn request(method: &str, params: Value) -> JsonRpcRequest {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    }))
    .expect("request")
}

async fn call(server: &McpServer, name: &str, arguments: Value) -> (Value, bool) {
    let response = server
        .handle_request(request(
            "tools/call",
            json!({"name": name, "arguments": arguments}),
        ))
        .await
        .expect("response");
    let result = response.result.expect("tools/call result");
    let is_error = result.get("isError").and_then(|v| v.as_bool()).unwrap_or(false);
    let text = result["content"][0]["text"].as_str().expect("text block");
    (serde_json::from_str(text).expect("envelope json"), is_error)
}

fn error_of(response: JsonRpcResponse) -> (i32, String) {
    let error = response.error.expect("json-rpc error");
    (error.code, error.message)
}

#[tokio::test]
async fn tools_list_publishes_catalog_and_aliases_once() {
    let server = McpServer::new(app_with(ScriptedTransport::new()));
    let response = server
        .handle_request(request("tools/list", json!({})))
        .await
        .expect("response");
    let result = response.result.expect("result");
    let tools = result["tools"].as_array().expect("tools");
    let names: HashSet<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();

    assert_eq!(names.len(), tools.len(), "tools/list must not repeat names");
    for name in [
        "mcp_databases",
        "mcp_backups",
        "mcp_storages",
        "mcp_notifiers",
        "mcp_workspaces",
        "mcp_health",
        "mcp_stats",
        "databases",
        "backups",
        "stats",
    ] {
        assert!(names.contains(name), "{} should be listed", name);
    }
    for tool in tools {
        assert!(tool["inputSchema"]["properties"].get("trace_id").is_none());
    }
}

#[tokio::test]
async fn initialize_and_ping_answer() {
    let server = McpServer::new(app_with(ScriptedTransport::new()));
    let init = server
        .handle_request(request("initialize", json!({})))
        .await
        .expect("init")
        .result
        .expect("result");
    assert_eq!(init["serverInfo"]["name"], json!("backup-mcp"));
    assert!(init["capabilities"]["tools"].is_object());

    let ping = server
        .handle_request(request("ping", json!({})))
        .await
        .expect("ping");
    assert_eq!(ping.result, Some(json!({})));
}

#[tokio::test]
async fn unknown_method_and_tool_are_protocol_errors() {
    let server = McpServer::new(app_with(ScriptedTransport::new()));
    let response = server
        .handle_request(request("resources/list", json!({})))
        .await
        .expect("response");
    assert_eq!(error_of(response).0, -32601);

    let response = server
        .handle_request(request(
            "tools/call",
            json!({"name": "mcp_backup", "arguments": {"action": "list"}}),
        ))
        .await
        .expect("response");
    let (code, message) = error_of(response);
    assert_eq!(code, -32602);
    assert!(message.contains("Unknown tool: mcp_backup"));
    assert!(message.contains("mcp_backups"));
}

#[tokio::test]
async fn notifications_get_no_response() {
    let server = McpServer::new(app_with(ScriptedTransport::new()));
    let notification: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }))
    .expect("notification");
    assert!(server.handle_request(notification).await.is_none());
}

#[tokio::test]
async fn schema_violations_never_reach_the_service() {
    let transport = ScriptedTransport::new();
    let server = McpServer::new(app_with(transport.clone()));

    let (envelope, is_error) = call(&server, "mcp_databases", json!({"action": "drop"})).await;
    assert!(is_error);
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"]["kind"], json!("invalid_params"));
    let message = envelope["error"]["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("Invalid arguments for mcp_databases:drop"));

    let (_, is_error) = call(&server, "mcp_health", json!({"action": "list"})).await;
    assert!(is_error);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn database_list_is_projected_unless_verbose() {
    let body = json!([{
        "id": "db-1",
        "name": "orders",
        "type": "POSTGRES",
        "workspaceId": "w1",
        "config": {"host": "db.internal", "password": "hunter2"}
    }])
    .to_string();
    let transport = ScriptedTransport::new().reply(200, &body).reply(200, &body);
    let server = McpServer::new(app_with(transport.clone()));

    let (envelope, is_error) = call(
        &server,
        "databases",
        json!({"action": "list", "workspace_id": "w1", "trace_id": "trace-7"}),
    )
    .await;
    assert!(!is_error);
    assert_eq!(envelope["tool"], json!("databases"));
    assert_eq!(envelope["trace"]["trace_id"], json!("trace-7"));
    assert_eq!(
        envelope["result"],
        json!([{"id": "db-1", "name": "orders", "type": "POSTGRES", "workspaceId": "w1"}])
    );
    assert_eq!(
        transport.last_request().url,
        format!("{}/api/databases?workspaceId=w1", BASE_URL)
    );

    let (envelope, _) = call(
        &server,
        "mcp_databases",
        json!({"action": "list", "verbose": true}),
    )
    .await;
    assert_eq!(envelope["result"][0]["config"]["password"], json!("***"));
    assert_eq!(envelope["result"][0]["config"]["host"], json!("db.internal"));
}

#[tokio::test]
async fn notifier_get_uses_long_marker() {
    let body = json!({
        "id": "n1",
        "type": "TELEGRAM",
        "config": {"botToken": "123:abc", "chatId": "42"}
    })
    .to_string();
    let server = McpServer::new(app_with(ScriptedTransport::new().reply(200, &body)));
    let (envelope, _) = call(&server, "notifiers", json!({"action": "get", "id": "n1"})).await;
    assert_eq!(envelope["result"]["config"]["botToken"], json!("***REDACTED***"));
    assert_eq!(envelope["result"]["config"]["chatId"], json!("42"));
}

#[tokio::test]
async fn backup_summary_aggregates_listing() {
    let body = json!([
        {"id": "b1", "status": "COMPLETED", "sizeBytes": 10, "createdAt": "2026-03-01T00:00:00Z"},
        {"id": "b2", "status": "COMPLETED", "sizeBytes": 20, "createdAt": "2026-03-02T00:00:00Z"},
        {"id": "b3", "status": "IN_PROGRESS", "createdAt": "2026-03-03T00:00:00Z"}
    ])
    .to_string();
    let transport = ScriptedTransport::new().reply(200, &body);
    let server = McpServer::new(app_with(transport.clone()));

    let (envelope, is_error) = call(
        &server,
        "mcp_backups",
        json!({"action": "summary", "database_id": "db-1"}),
    )
    .await;
    assert!(!is_error);
    let summary = &envelope["result"];
    assert_eq!(summary["total"], json!(3));
    assert_eq!(summary["by_status"]["COMPLETED"], json!(2));
    assert_eq!(summary["total_size_bytes"], json!(30));
    assert_eq!(summary["latest"]["id"], json!("b3"));
    assert_eq!(
        transport.last_request().url,
        format!("{}/api/backups?databaseId=db-1", BASE_URL)
    );
}

#[tokio::test]
async fn service_errors_become_error_results() {
    let transport =
        ScriptedTransport::new().reply(404, r#"{"error": "Database not found"}"#);
    let server = McpServer::new(app_with(transport));
    let (envelope, is_error) = call(
        &server,
        "mcp_databases",
        json!({"action": "get", "id": "missing"}),
    )
    .await;
    assert!(is_error);
    assert_eq!(envelope["action"], json!("get"));
    assert_eq!(envelope["error"]["message"], json!("Database not found"));
    assert_eq!(envelope["error"]["kind"], json!("not_found"));
    assert_eq!(envelope["error"]["details"]["status"], json!(404));
}

#[tokio::test]
async fn delete_reports_deleted_id() {
    let transport = ScriptedTransport::new().reply(204, "");
    let server = McpServer::new(app_with(transport.clone()));
    let (envelope, is_error) =
        call(&server, "mcp_workspaces", json!({"action": "delete", "id": "w-1"})).await;
    assert!(!is_error);
    assert_eq!(envelope["result"], json!({"success": true, "deleted": "w-1"}));
    let request = transport.last_request();
    assert_eq!(request.method, reqwest::Method::DELETE);
    assert_eq!(request.header("X-API-Key"), Some("test-key"));
}

#[tokio::test]
async fn stdio_loop_answers_each_line() {
    let transport = ScriptedTransport::new().reply(200, r#"{"totalBackups": 5}"#);
    let server = McpServer::new(app_with(transport));
    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n",
        "\n",
        "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        "not json\n",
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"stats\",\"arguments\":{\"action\":\"get\"}}}\n",
    );
    let mut output: Vec<u8> = Vec::new();
    server
        .serve(tokio::io::BufReader::new(input.as_bytes()), &mut output)
        .await
        .expect("serve");

    let lines: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], json!(1));
    assert_eq!(lines[1]["error"]["code"], json!(-32700));
    assert_eq!(lines[2]["id"], json!(2));
    let text = lines[2]["result"]["content"][0]["text"].as_str().expect("text");
    let envelope: Value = serde_json::from_str(text).expect("envelope");
    assert_eq!(envelope["result"]["totalBackups"], json!(5));
}

#[tokio::test]
async fn padded_ids_reach_the_service_unchanged() {
    let transport = ScriptedTransport::new().reply(200, r#"{"id":" db-1 "}"#);
    let server = McpServer::new(app_with(transport.clone()));
    let (_, is_error) = call(&server, "mcp_databases", json!({"action": "get", "id": " db-1 "})).await;
    assert!(!is_error);
    assert_eq!(
        transport.last_request().url,
        format!("{}/api/databases/ db-1 ", BASE_URL)
    );
}

#[tokio::test]
async fn stats_requires_an_action_like_every_tool() {
    let transport = ScriptedTransport::new();
    let server = McpServer::new(app_with(transport.clone()));
    let (envelope, is_error) = call(&server, "mcp_stats", json!({})).await;
    assert!(is_error);
    let message = envelope["error"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("missing required field 'action'"));
    assert!(transport.requests().is_empty());
}
