use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::sync::Arc;

const STATS_ACTIONS: &[&str] = &["get"];

#[derive(Clone)]
pub struct StatsManager {
    client: Arc<BackupApiClient>,
}

impl StatsManager {
    pub fn new(client: Arc<BackupApiClient>) -> Self {
        Self { client }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "get" => Ok(self.client.get_stats().await?),
            _ => Err(unknown_action_error("stats", action, STATS_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for StatsManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api_client::ClientConfig;
    use crate::services::logger::{LogLevel, Logger};
    use crate::services::transport::ReqwestTransport;

    #[tokio::test]
    async fn missing_action_is_rejected_before_any_request() {
        let client = BackupApiClient::new(
            ClientConfig::new("http://127.0.0.1:9", None, None),
            Arc::new(ReqwestTransport::new()),
            Logger::with_level("test", LogLevel::Error),
        );
        let err = StatsManager::new(Arc::new(client))
            .handle_action(serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unknown stats action: ");
        assert!(err.hint.unwrap_or_default().contains("Use one of: get."));
    }
}
