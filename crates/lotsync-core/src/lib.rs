//! Domain types and pure logic for parking-lot occupancy sync.
//!
//! Everything here is synchronous and free of I/O except config and lot
//! table loading: the HTTP fetcher and poll scheduler live in
//! `lotsync-client`, rendering lives in the CLI.

pub mod app_config;
pub mod config;
pub mod filter;
pub mod lots;
pub mod normalize;
pub mod record;
pub mod thresholds;

use thiserror::Error;

pub use app_config::{AppConfig, MapSchema};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{filter_and_sort, FALLBACK_PRIORITY};
pub use lots::{load_lot_table, LotSpec, LotTable, MapPosition};
pub use normalize::{normalize_response, ResponseShape};
pub use record::{lot_id_from_key, LotRecord};
pub use thresholds::{OccupancyBucket, Thresholds};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read lot table {path}: {source}")]
    LotsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lot table: {0}")]
    LotsFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Everything the normalize → filter → sort pass needs, bundled so the
/// scheduler can hold one value per session.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub lots: LotTable,
    pub map_schema: MapSchema,
}

impl Pipeline {
    #[must_use]
    pub fn new(lots: LotTable, map_schema: MapSchema) -> Self {
        Self { lots, map_schema }
    }

    /// Builds the pipeline described by an [`AppConfig`].
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.lots.clone(), config.map_schema)
    }

    /// Runs normalization, allow-list filtering and priority ordering over a
    /// raw response body. Never fails: unrecognized shapes yield an empty list.
    #[must_use]
    pub fn run(&self, body: &serde_json::Value) -> Vec<LotRecord> {
        let candidates = normalize_response(body, self.map_schema, &self.lots);
        filter_and_sort(candidates, &self.lots)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(LotTable::default(), MapSchema::default())
    }
}
