use crate::errors::ToolError;
use crate::managers;
use crate::mcp::aliases::builtin_tool_alias_map_owned;
use crate::mcp::catalog::tool_catalog;
use crate::services::api_client::{BackupApiClient, ClientConfig};
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::transport::{HttpTransport, ReqwestTransport};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub client: Arc<BackupApiClient>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize(config: ClientConfig, logger: Logger) -> Result<Self, ToolError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()), logger)
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        logger: Logger,
    ) -> Result<Self, ToolError> {
        let validation = Validation::new();
        let client = Arc::new(BackupApiClient::new(config, transport, logger.clone()));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert(
            "mcp_databases".to_string(),
            Arc::new(managers::databases::DatabaseManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
        );
        handlers.insert(
            "mcp_backups".to_string(),
            Arc::new(managers::backups::BackupManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
        );
        handlers.insert(
            "mcp_storages".to_string(),
            Arc::new(managers::storages::StorageManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
        );
        handlers.insert(
            "mcp_notifiers".to_string(),
            Arc::new(managers::notifiers::NotifierManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
        );
        handlers.insert(
            "mcp_workspaces".to_string(),
            Arc::new(managers::workspaces::WorkspaceManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            )),
        );
        handlers.insert(
            "mcp_health".to_string(),
            Arc::new(managers::health::HealthManager::new(
                validation.clone(),
                client.clone(),
            )),
        );
        handlers.insert(
            "mcp_stats".to_string(),
            Arc::new(managers::stats::StatsManager::new(client.clone())),
        );

        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(
            logger.clone(),
            handlers,
            builtin_tool_alias_map_owned(),
        ));

        Ok(Self {
            logger,
            client,
            tool_executor,
        })
    }
}
