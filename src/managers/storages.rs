use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::redact::CONFIG_REDACTOR;
use crate::utils::shaping::{project, redact_config};
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::sync::Arc;

const STORAGE_ACTIONS: &[&str] = &["list", "get", "create", "update", "delete", "test"];

pub const STORAGE_SUMMARY_FIELDS: &[&str] = &["id", "name", "type", "workspaceId", "lastSaveError"];

#[derive(Clone)]
pub struct StorageManager {
    logger: Logger,
    validation: Validation,
    client: Arc<BackupApiClient>,
}

impl StorageManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<BackupApiClient>) -> Self {
        Self {
            logger: logger.child("storages"),
            validation,
            client,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "list" => {
                let workspace_id = self
                    .validation
                    .ensure_optional_string(args.get("workspace_id"), "workspace_id")?;
                let storages = self.client.list_storages(workspace_id.as_deref()).await?;
                if self.validation.flag(args.get("verbose")) {
                    Ok(redact_config(&storages, &CONFIG_REDACTOR))
                } else {
                    Ok(project(&storages, STORAGE_SUMMARY_FIELDS))
                }
            }
            "get" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let storage = self.client.get_storage(&id).await?;
                Ok(redact_config(&storage, &CONFIG_REDACTOR))
            }
            "create" => {
                let definition = self
                    .validation
                    .ensure_object(args.get("definition"), "definition")?;
                let created = self.client.create_storage(&definition).await?;
                Ok(redact_config(&created, &CONFIG_REDACTOR))
            }
            "update" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let changes = self.validation.ensure_object(args.get("changes"), "changes")?;
                let updated = self.client.update_storage(&id, &changes).await?;
                Ok(redact_config(&updated, &CONFIG_REDACTOR))
            }
            "delete" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                self.client.delete_storage(&id).await?;
                self.logger
                    .info("storage deleted", Some(&serde_json::json!({ "id": id })));
                Ok(serde_json::json!({ "success": true, "deleted": id }))
            }
            "test" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                Ok(self.client.test_storage(&id).await?)
            }
            _ => Err(unknown_action_error("storages", action, STORAGE_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for StorageManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
