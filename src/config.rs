use crate::constants::env::{API_KEY, API_TOKEN, API_URL, LOG_LEVEL};
use crate::constants::protocols::ALLOWED_HTTP;
use crate::errors::ToolError;
use crate::services::api_client::ClientConfig;
use crate::services::logger::LogLevel;
use clap::Parser;
use url::Url;

/// MCP server exposing a backup-management REST API as agent tools.
#[derive(Debug, Clone, Parser)]
#[command(name = "backup-mcp", version, about)]
pub struct Cli {
    /// Base URL of the backup service, e.g. https://backups.example.com
    #[arg(long = "api-url", env = API_URL)]
    pub api_url: String,

    /// API key sent as X-API-Key
    #[arg(long = "api-key", env = API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Bearer token; takes precedence over the API key
    #[arg(long = "api-token", env = API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// error, warn, info or debug
    #[arg(long = "log-level", env = LOG_LEVEL, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level)
    }

    pub fn client_config(&self) -> Result<ClientConfig, ToolError> {
        let raw = self.api_url.trim();
        let parsed = Url::parse(raw).map_err(|err| {
            ToolError::invalid_params(format!("{} is not a valid URL: {}", API_URL, err))
        })?;
        if !scheme_allowed(parsed.scheme()) {
            return Err(ToolError::invalid_params(format!(
                "{} must use http or https",
                API_URL
            )));
        }
        Ok(ClientConfig::new(
            raw,
            self.api_key.clone(),
            self.api_token.clone(),
        ))
    }
}

fn scheme_allowed(scheme: &str) -> bool {
    ALLOWED_HTTP
        .iter()
        .any(|allowed| allowed.trim_end_matches(':') == scheme)
}
