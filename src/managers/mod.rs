pub mod backups;
pub mod databases;
pub mod health;
pub mod notifiers;
pub mod stats;
pub mod storages;
pub mod workspaces;
