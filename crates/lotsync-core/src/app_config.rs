use std::path::PathBuf;
use std::time::Duration;

use crate::lots::LotTable;
use crate::thresholds::Thresholds;

/// How a key/value-shaped `getLotCount` body is read.
///
/// The backend has shipped both `{ "G": 45.0 }` (occupancy percent) and
/// `{ "G": 99 }` (available spaces). The two cannot be told apart from the
/// payload, so the interpretation is configured rather than guessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapSchema {
    #[default]
    Percent,
    Available,
}

impl std::fmt::Display for MapSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapSchema::Percent => write!(f, "percent"),
            MapSchema::Available => write!(f, "available"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub poll_interval: Duration,
    pub thresholds: Thresholds,
    pub map_schema: MapSchema,
    pub lots: LotTable,
    pub lots_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"[redacted]")
            .field("poll_interval", &self.poll_interval)
            .field("thresholds", &self.thresholds)
            .field("map_schema", &self.map_schema)
            .field("allowed_lots", self.lots.allowed())
            .field("lots_path", &self.lots_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
