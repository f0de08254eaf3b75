use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::services::validation::Validation;
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::sync::Arc;

const HEALTH_ACTIONS: &[&str] = &["list", "latest"];

/// Health-check history of a database.
#[derive(Clone)]
pub struct HealthManager {
    validation: Validation,
    client: Arc<BackupApiClient>,
}

impl HealthManager {
    pub fn new(validation: Validation, client: Arc<BackupApiClient>) -> Self {
        Self { validation, client }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        let action_name = action.and_then(|v| v.as_str()).unwrap_or("");
        if !HEALTH_ACTIONS.contains(&action_name) {
            return Err(unknown_action_error("health", action, HEALTH_ACTIONS));
        }
        let database_id = self
            .validation
            .ensure_string(args.get("database_id"), "database_id")?;
        let result = if action_name == "latest" {
            self.client.latest_health_check(&database_id).await?
        } else {
            self.client.list_health_checks(&database_id).await?
        };
        Ok(result)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for HealthManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
