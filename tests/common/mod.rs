#![allow(dead_code)]

use async_trait::async_trait;
use backup_mcp::app::App;
use backup_mcp::services::api_client::{BackupApiClient, ClientConfig};
use backup_mcp::services::logger::{LogLevel, Logger};
use backup_mcp::services::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://backup.test";

/// Replays canned outcomes in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, status: u16, body: &str) -> Arc<Self> {
        self.push(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }))
    }

    pub fn fail(self: &Arc<Self>, error: TransportError) -> Arc<Self> {
        self.push(Err(error))
    }

    fn push(self: &Arc<Self>, outcome: Result<HttpResponse, TransportError>) -> Arc<Self> {
        self.replies.lock().expect("replies lock").push_back(outcome);
        self.clone()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("at least one request")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().expect("seen lock").push(request);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    body: String::new(),
                })
            })
    }
}

pub fn quiet_logger() -> Logger {
    Logger::with_level("test", LogLevel::Error)
}

pub fn client_with(
    transport: Arc<ScriptedTransport>,
    api_key: Option<&str>,
    token: Option<&str>,
) -> BackupApiClient {
    let config = ClientConfig::new(
        BASE_URL,
        api_key.map(str::to_string),
        token.map(str::to_string),
    );
    BackupApiClient::new(config, transport, quiet_logger())
}

pub fn app_with(transport: Arc<ScriptedTransport>) -> App {
    let config = ClientConfig::new(BASE_URL, Some("test-key".to_string()), None);
    App::with_transport(config, transport, quiet_logger()).expect("app wiring")
}
