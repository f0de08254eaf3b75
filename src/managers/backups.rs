use crate::errors::ToolError;
use crate::services::api_client::BackupApiClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::shaping::project;
use crate::utils::tool_errors::unknown_action_error;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const BACKUP_ACTIONS: &[&str] = &["list", "get", "delete", "restore", "summary"];

pub const BACKUP_SUMMARY_FIELDS: &[&str] = &[
    "id",
    "databaseId",
    "storageId",
    "status",
    "sizeBytes",
    "durationMs",
    "createdAt",
    "failMessage",
];

#[derive(Clone)]
pub struct BackupManager {
    logger: Logger,
    validation: Validation,
    client: Arc<BackupApiClient>,
}

impl BackupManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<BackupApiClient>) -> Self {
        Self {
            logger: logger.child("backups"),
            validation,
            client,
        }
    }

    pub async fn handle_action(&self, args: Value) -> Result<Value, ToolError> {
        let action = args.get("action");
        match action.and_then(|v| v.as_str()).unwrap_or("") {
            "list" => {
                let backups = self.fetch_backups(&args).await?;
                if self.validation.flag(args.get("verbose")) {
                    Ok(backups)
                } else {
                    Ok(project(&backups, BACKUP_SUMMARY_FIELDS))
                }
            }
            "get" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                Ok(self.client.get_backup(&id).await?)
            }
            "delete" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                self.client.delete_backup(&id).await?;
                self.logger
                    .info("backup deleted", Some(&serde_json::json!({ "id": id })));
                Ok(serde_json::json!({ "success": true, "deleted": id }))
            }
            "restore" => {
                let id = self.validation.ensure_string(args.get("id"), "id")?;
                let outcome = self.client.restore_backup(&id).await?;
                self.logger
                    .info("restore requested", Some(&serde_json::json!({ "id": id })));
                Ok(outcome)
            }
            "summary" => {
                let backups = self.fetch_backups(&args).await?;
                Ok(summarize_backups(&backups))
            }
            _ => Err(unknown_action_error("backups", action, BACKUP_ACTIONS)),
        }
    }

    async fn fetch_backups(&self, args: &Value) -> Result<Value, ToolError> {
        let database_id = self
            .validation
            .ensure_optional_string(args.get("database_id"), "database_id")?;
        Ok(self.client.list_backups(database_id.as_deref()).await?)
    }
}

/// Per-status counts, total size and the most recent run of a backup listing.
pub fn summarize_backups(backups: &Value) -> Value {
    let items: &[Value] = backups.as_array().map(Vec::as_slice).unwrap_or(&[]);

    let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_size_bytes: u64 = 0;
    for item in items {
        let status = item
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        *by_status.entry(status).or_insert(0) += 1;
        let size = item
            .get("sizeBytes")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or(0);
        total_size_bytes = total_size_bytes.saturating_add(size);
    }

    // ISO-8601 timestamps order lexicographically.
    let latest = items
        .iter()
        .filter_map(|item| {
            item.get("createdAt")
                .and_then(|v| v.as_str())
                .map(|created| (created, item))
        })
        .max_by(|a, b| a.0.cmp(b.0))
        .map(|(_, item)| project(item, BACKUP_SUMMARY_FIELDS))
        .unwrap_or(Value::Null);

    serde_json::json!({
        "total": items.len(),
        "by_status": by_status,
        "total_size_bytes": total_size_bytes,
        "latest": latest,
    })
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for BackupManager {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.handle_action(args).await
    }
}
