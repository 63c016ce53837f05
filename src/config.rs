use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP port to listen on.
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    pub log_level: String,

    /// Path to the snapshot file holding the link database.
    pub db_path: String,

    /// Minimum interval (seconds) between snapshot writes. Snapshots happen
    /// on a write once at least this much time has passed since the last
    /// one, so an idle process does no disk I/O.
    pub sync_interval: u64,

    pub server_version: String,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Self {
        let file = fs::read_to_string(path).expect("Failed to read config.json");

        serde_json::from_str::<AppConfig>(&file).expect("Invalid config.json")
    }
}
