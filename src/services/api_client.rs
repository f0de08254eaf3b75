use crate::constants::api::{
    BACKUPS, CONTENT_TYPE_JSON, DATABASES, HEALTH_CHECKS, NOTIFIERS, STATS, STORAGES, WORKSPACES,
};
use crate::constants::limits::INVALID_JSON_PREVIEW_CHARS;
use crate::errors::ApiClientError;
use crate::services::logger::Logger;
use crate::services::transport::{HttpRequest, HttpTransport};
use crate::utils::text::take_chars;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    None,
    ApiKey(String),
    Bearer(String),
}

/// Immutable connection settings for the backup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    credentials: Credentials,
}

impl ClientConfig {
    /// Strips one trailing slash from `base_url`. A bearer token wins over an
    /// API key; empty credentials count as absent.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        bearer_token: Option<String>,
    ) -> Self {
        let base_url = base_url.into();
        let base_url = base_url
            .strip_suffix('/')
            .map(str::to_string)
            .unwrap_or(base_url);
        let api_key = api_key.filter(|v| !v.is_empty());
        let bearer_token = bearer_token.filter(|v| !v.is_empty());
        let credentials = match (bearer_token, api_key) {
            (Some(token), _) => Credentials::Bearer(token),
            (None, Some(key)) => Credentials::ApiKey(key),
            (None, None) => Credentials::None,
        };
        Self {
            base_url,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())];
        match &self.credentials {
            Credentials::Bearer(token) => {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)))
            }
            Credentials::ApiKey(key) => headers.push(("X-API-Key".to_string(), key.clone())),
            Credentials::None => {}
        }
        headers
    }

    /// Joins base URL and path; query pairs with a value are appended verbatim.
    pub fn url(&self, path: &str, query: &[(&str, Option<&str>)]) -> String {
        let pairs: Vec<String> = query
            .iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
            .collect();
        if pairs.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, pairs.join("&"))
        }
    }
}

/// Single point of contact with the backup-management REST API.
#[derive(Clone)]
pub struct BackupApiClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    logger: Logger,
}

impl BackupApiClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>, logger: Logger) -> Self {
        Self {
            config,
            transport,
            logger: logger.child("api"),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, Option<&str>)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiClientError> {
        let url = self.config.url(path, query);
        let body = match body {
            Some(payload) if method == Method::POST || method == Method::PUT => {
                Some(payload.to_string())
            }
            _ => None,
        };
        let request = HttpRequest {
            method: method.clone(),
            url,
            headers: self.config.headers(),
            body,
        };

        self.logger.debug(
            "request",
            Some(&serde_json::json!({"method": method.as_str(), "path": path})),
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| ApiClientError::Network(err.to_string()))?;

        let parsed = if response.body.is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(&response.body).map_err(|_| {
                ApiClientError::ResponseFormat(take_chars(
                    &response.body,
                    INVALID_JSON_PREVIEW_CHARS,
                ))
            })?)
        };

        if !response.is_success() {
            let message = error_message(parsed.as_ref())
                .unwrap_or_else(|| format!("HTTP error {}", response.status));
            self.logger.warn(
                "request failed",
                Some(&serde_json::json!({
                    "method": method.as_str(),
                    "path": path,
                    "status": response.status,
                })),
            );
            return Err(ApiClientError::Api {
                status: response.status,
                message,
            });
        }

        Ok(parsed)
    }

    async fn fetch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, Option<&str>)],
        body: Option<&Value>,
    ) -> Result<Value, ApiClientError> {
        Ok(self
            .request(method, path, query, body)
            .await?
            .unwrap_or(Value::Null))
    }

    async fn remove(&self, path: &str) -> Result<(), ApiClientError> {
        self.request(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    // Databases

    pub async fn list_databases(&self, workspace_id: Option<&str>) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, DATABASES, &[("workspaceId", workspace_id)], None)
            .await
    }

    pub async fn get_database(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, &item_path(DATABASES, id), &[], None)
            .await
    }

    pub async fn create_database(&self, definition: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, DATABASES, &[], Some(definition)).await
    }

    pub async fn update_database(&self, id: &str, changes: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::PUT, &item_path(DATABASES, id), &[], Some(changes))
            .await
    }

    pub async fn delete_database(&self, id: &str) -> Result<(), ApiClientError> {
        self.remove(&item_path(DATABASES, id)).await
    }

    pub async fn trigger_backup(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, &action_path(DATABASES, id, "backup"), &[], None)
            .await
    }

    pub async fn test_database_connection(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(
            Method::POST,
            &action_path(DATABASES, id, "test-connection"),
            &[],
            None,
        )
        .await
    }

    // Backups

    pub async fn list_backups(&self, database_id: Option<&str>) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, BACKUPS, &[("databaseId", database_id)], None)
            .await
    }

    pub async fn get_backup(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, &item_path(BACKUPS, id), &[], None).await
    }

    pub async fn delete_backup(&self, id: &str) -> Result<(), ApiClientError> {
        self.remove(&item_path(BACKUPS, id)).await
    }

    pub async fn restore_backup(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, &action_path(BACKUPS, id, "restore"), &[], None)
            .await
    }

    // Storages

    pub async fn list_storages(&self, workspace_id: Option<&str>) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, STORAGES, &[("workspaceId", workspace_id)], None)
            .await
    }

    pub async fn get_storage(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, &item_path(STORAGES, id), &[], None).await
    }

    pub async fn create_storage(&self, definition: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, STORAGES, &[], Some(definition)).await
    }

    pub async fn update_storage(&self, id: &str, changes: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::PUT, &item_path(STORAGES, id), &[], Some(changes))
            .await
    }

    pub async fn delete_storage(&self, id: &str) -> Result<(), ApiClientError> {
        self.remove(&item_path(STORAGES, id)).await
    }

    pub async fn test_storage(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, &action_path(STORAGES, id, "test"), &[], None)
            .await
    }

    // Notifiers

    pub async fn list_notifiers(&self, workspace_id: Option<&str>) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, NOTIFIERS, &[("workspaceId", workspace_id)], None)
            .await
    }

    pub async fn get_notifier(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, &item_path(NOTIFIERS, id), &[], None)
            .await
    }

    pub async fn create_notifier(&self, definition: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, NOTIFIERS, &[], Some(definition)).await
    }

    pub async fn update_notifier(&self, id: &str, changes: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::PUT, &item_path(NOTIFIERS, id), &[], Some(changes))
            .await
    }

    pub async fn delete_notifier(&self, id: &str) -> Result<(), ApiClientError> {
        self.remove(&item_path(NOTIFIERS, id)).await
    }

    pub async fn test_notifier(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, &action_path(NOTIFIERS, id, "test"), &[], None)
            .await
    }

    // Workspaces

    pub async fn list_workspaces(&self) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, WORKSPACES, &[], None).await
    }

    pub async fn get_workspace(&self, id: &str) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, &item_path(WORKSPACES, id), &[], None)
            .await
    }

    pub async fn create_workspace(&self, definition: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::POST, WORKSPACES, &[], Some(definition)).await
    }

    pub async fn update_workspace(&self, id: &str, changes: &Value) -> Result<Value, ApiClientError> {
        self.fetch(Method::PUT, &item_path(WORKSPACES, id), &[], Some(changes))
            .await
    }

    pub async fn delete_workspace(&self, id: &str) -> Result<(), ApiClientError> {
        self.remove(&item_path(WORKSPACES, id)).await
    }

    // Health checks and stats

    pub async fn list_health_checks(&self, database_id: &str) -> Result<Value, ApiClientError> {
        self.fetch(
            Method::GET,
            &action_path(DATABASES, database_id, HEALTH_CHECKS),
            &[],
            None,
        )
        .await
    }

    pub async fn latest_health_check(&self, database_id: &str) -> Result<Value, ApiClientError> {
        let path = format!(
            "{}/latest",
            action_path(DATABASES, database_id, HEALTH_CHECKS)
        );
        self.fetch(Method::GET, &path, &[], None).await
    }

    pub async fn get_stats(&self) -> Result<Value, ApiClientError> {
        self.fetch(Method::GET, STATS, &[], None).await
    }
}

fn item_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, id)
}

fn action_path(collection: &str, id: &str, action: &str) -> String {
    format!("{}/{}/{}", collection, id, action)
}

fn error_message(body: Option<&Value>) -> Option<String> {
    let body = body?;
    body.get("error")
        .and_then(|v| v.as_str())
        .or_else(|| body.get("message").and_then(|v| v.as_str()))
        .map(str::to_string)
}
