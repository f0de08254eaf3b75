use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::shaping::project;
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::sync::Arc;

const WORKSPACE_ACTIONS: &[&str] = &["list", "get", "create", "update", "delete"];

pub const WORKSPACE_SUMMARY_FIELDS: &[&str] = &["id", "name", "createdAt"];

#[derive(Clone)]
pub struct WorkspaceManager {
    logger: Logger,
    validation: Validation,
    client: Arc<BackupApiClient>,
}

impl WorkspaceManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<BackupApiClient>) -> Self {
        Self {
            logger: logger.child("workspaces"),
            validation,
            client,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "list" => {
                let workspaces = self.client.list_workspaces().await?;
                if self.validation.flag(args.get("verbose")) {
                    Ok(workspaces)
                } else {
                    Ok(project(&workspaces, WORKSPACE_SUMMARY_FIELDS))
                }
            }
            "get" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                Ok(self.client.get_workspace(&id).await?)
            }
            "create" => {
                let definition = self
                    .validation
                    .ensure_object(args.get("definition"), "definition")?;
                Ok(self.client.create_workspace(&definition).await?)
            }
            "update" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let changes = self.validation.ensure_object(args.get("changes"), "changes")?;
                Ok(self.client.update_workspace(&id, &changes).await?)
            }
            "delete" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                self.client.delete_workspace(&id).await?;
                self.logger
                    .info("workspace deleted", Some(&serde_json::json!({ "id": id })));
                Ok(serde_json::json!({ "success": true, "deleted": id }))
            }
            _ => Err(unknown_action_error("workspaces", action, WORKSPACE_ACTIONS)),
        }
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for WorkspaceManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
