pub mod api_client;
pub mod logger;
pub mod tool_executor;
pub mod transport;
pub mod validation;
