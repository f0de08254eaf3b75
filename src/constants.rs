pub mod api {
    pub const DATABASES: &str = "/api/databases";
    pub const BACKUPS: &str = "/api/backups";
    pub const STORAGES: &str = "/api/storages";
    pub const NOTIFIERS: &str = "/api/notifiers";
    pub const WORKSPACES: &str = "/api/workspaces";
    pub const STATS: &str = "/api/stats";
    pub const HEALTH_CHECKS: &str = "health-checks";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

pub mod limits {
    pub const INVALID_JSON_PREVIEW_CHARS: usize = 100;
    pub const LOG_TEXT_MAX_BYTES: usize = 2048;
    pub const MAX_SUGGESTIONS: usize = 5;
}

pub mod env {
    pub const API_URL: &str = "BACKUP_API_URL";
    pub const API_KEY: &str = "BACKUP_API_KEY";
    pub const API_TOKEN: &str = "BACKUP_API_TOKEN";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}
