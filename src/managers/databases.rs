use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::redact::CONFIG_REDACTOR;
use crate::utils::shaping::{project, redact_config};
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::sync::Arc;

const DATABASE_ACTIONS: &[&str] = &[
    "list",
    "get",
    "create",
    "update",
    "delete",
    "backup",
    "test_connection",
];

pub const DATABASE_SUMMARY_FIELDS: &[&str] = &[
    "id",
    "name",
    "type",
    "workspaceId",
    "backupInterval",
    "lastBackupTime",
    "lastBackupStatus",
    "healthStatus",
];

#[derive(Clone)]
pub struct DatabaseManager {
    logger: Logger,
    validation: Validation,
    client: Arc<BackupApiClient>,
}

impl DatabaseManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<BackupApiClient>) -> Self {
        Self {
            logger: logger.child("databases"),
            validation,
            client,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "list" => self.list(&args).await,
            "get" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let database = self.client.get_database(&id).await?;
                Ok(redact_config(&database, &CONFIG_REDACTOR))
            }
            "create" => {
                let definition = self
                    .validation
                    .ensure_object(args.get("definition"), "definition")?;
                let created = self.client.create_database(&definition).await?;
                Ok(redact_config(&created, &CONFIG_REDACTOR))
            }
            "update" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let changes = self.validation.ensure_object(args.get("changes"), "changes")?;
                let updated = self.client.update_database(&id, &changes).await?;
                Ok(redact_config(&updated, &CONFIG_REDACTOR))
            }
            "delete" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                self.client.delete_database(&id).await?;
                self.logger
                    .info("database deleted", Some(&serde_json::json!({ "id": id })));
                Ok(serde_json::json!({ "success": true, "deleted": id }))
            }
            "backup" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let outcome = self.client.trigger_backup(&id).await?;
                self.logger
                    .info("backup triggered", Some(&serde_json::json!({ "id": id })));
                Ok(outcome)
            }
            "test_connection" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                Ok(self.client.test_database_connection(&id).await?)
            }
            _ => Err(unknown_action_error("databases", action, DATABASE_ACTIONS)),
        }
    }

    async fn list(&self, args: &Value) -> Result<Value, ToolError> {
        let workspace_id = self
            .validation
            .ensure_optional_string(args.get("workspace_id"), "workspace_id")?;
        let databases = self.client.list_databases(workspace_id.as_deref()).await?;
        if self.validation.flag(args.get("verbose")) {
            return Ok(redact_config(&databases, &CONFIG_REDACTOR));
        }
        Ok(project(&databases, DATABASE_SUMMARY_FIELDS))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for DatabaseManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
