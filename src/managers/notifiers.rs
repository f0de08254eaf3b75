use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::redact::NOTIFIER_REDACTOR;
use crate::utils::shaping::{project, redact_config};
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::sync::Arc;

const NOTIFIER_ACTIONS: &[&str] = &["list", "get", "create", "update", "delete", "test"];

pub const NOTIFIER_SUMMARY_FIELDS: &[&str] =
    &["id", "name", "notifierType", "workspaceId", "lastSendError"];

#[derive(Clone)]
pub struct NotifierManager {
    logger: Logger,
    validation: Validation,
    client: Arc<BackupApiClient>,
}

impl NotifierManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<BackupApiClient>) -> Self {
        Self {
            logger: logger.child("notifiers"),
            validation,
            client,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        let shown = match action.and_then(|v| v.as_str()).unwrap_or("") {
            "list" => {
                let workspace_id = self
                    .validation
                    .ensure_optional_string(args.get("workspace_id"), "workspace_id")?;
                let notifiers = self.client.list_notifiers(workspace_id.as_deref()).await?;
                if !self.validation.flag(args.get("verbose")) {
                    return Ok(project(&notifiers, NOTIFIER_SUMMARY_FIELDS));
                }
                notifiers
            }
            "get" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                self.client.get_notifier(&id).await?
            }
            "create" => {
                let definition = self
                    .validation
                    .ensure_object(args.get("definition"), "definition")?;
                self.client.create_notifier(&definition).await?
            }
            "update" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let changes = self.validation.ensure_object(args.get("changes"), "changes")?;
                self.client.update_notifier(&id, &changes).await?
            }
            "delete" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                self.client.delete_notifier(&id).await?;
                self.logger
                    .info("notifier deleted", Some(&serde_json::json!({ "id": id })));
                return Ok(serde_json::json!({ "success": true, "deleted": id }));
            }
            "test" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                return Ok(self.client.test_notifier(&id).await?);
            }
            _ => return Err(unknown_action_error("notifiers", action, NOTIFIER_ACTIONS)),
        };
        Ok(redact_config(&shown, &NOTIFIER_REDACTOR))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for NotifierManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
