//! The lot table: which lots are shown, in what order, and where they sit
//! on the campus map.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::record::lot_id_from_key;
use crate::ConfigError;

/// Relative marker position on a 100×100 map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPosition {
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSpec {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub position: Option<MapPosition>,
}

impl LotSpec {
    fn builtin(id: &str, capacity: u32, x: u8, y: u8) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            capacity: Some(capacity),
            position: Some(MapPosition { x, y }),
        }
    }

    /// Display name, falling back to `Lot <id>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Lot {}", self.id))
    }
}

#[derive(Debug, Deserialize)]
pub struct LotsFile {
    pub lots: Vec<LotSpec>,
}

/// Ordered lot metadata plus the allow-list.
///
/// Spec order is display priority: the first spec sorts first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotTable {
    specs: Vec<LotSpec>,
    allowed: BTreeSet<String>,
}

impl LotTable {
    /// Builds a table whose allow-list is exactly the spec ids.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on empty or duplicate ids,
    /// positions outside 0–100, or a zero capacity.
    pub fn new(specs: Vec<LotSpec>) -> Result<Self, ConfigError> {
        let specs = validate_specs(specs)?;
        let allowed = specs.iter().map(|s| s.id.clone()).collect();
        Ok(Self { specs, allowed })
    }

    /// Replaces the allow-list. Ids are normalized like raw lot keys and may
    /// name lots the table has no metadata for; those sort last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if an id normalizes to nothing.
    pub fn with_allowed<I, S>(mut self, ids: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = BTreeSet::new();
        for raw in ids {
            let id = lot_id_from_key(raw.as_ref());
            if id.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "allowed lot '{}' contains no letters",
                    raw.as_ref()
                )));
            }
            allowed.insert(id);
        }
        self.allowed = allowed;
        Ok(self)
    }

    #[must_use]
    pub fn allows(&self, lot_id: &str) -> bool {
        self.allowed.contains(lot_id)
    }

    #[must_use]
    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    /// Priority for a known lot (1-based, lower first); `None` if unmapped.
    #[must_use]
    pub fn priority(&self, lot_id: &str) -> Option<u32> {
        self.specs
            .iter()
            .position(|s| s.id == lot_id)
            .and_then(|i| u32::try_from(i + 1).ok())
    }

    #[must_use]
    pub fn spec(&self, lot_id: &str) -> Option<&LotSpec> {
        self.specs.iter().find(|s| s.id == lot_id)
    }

    #[must_use]
    pub fn capacity(&self, lot_id: &str) -> Option<u32> {
        self.spec(lot_id).and_then(|s| s.capacity)
    }

    /// Specs that are both allowed and placed on the map, in priority order.
    pub fn map_markers(&self) -> impl Iterator<Item = (&LotSpec, MapPosition)> {
        self.specs
            .iter()
            .filter(|s| self.allows(&s.id))
            .filter_map(|s| s.position.map(|p| (s, p)))
    }

    #[must_use]
    pub fn display_name(&self, lot_id: &str) -> String {
        self.spec(lot_id)
            .map_or_else(|| format!("Lot {lot_id}"), LotSpec::display_name)
    }
}

impl Default for LotTable {
    /// Lots G, H, J and M with the backend's fixed capacities and the
    /// campus map's quadrant positions.
    fn default() -> Self {
        let specs = vec![
            LotSpec::builtin("G", 169, 25, 30),
            LotSpec::builtin("H", 238, 75, 30),
            LotSpec::builtin("J", 153, 25, 70),
            LotSpec::builtin("M", 167, 75, 70),
        ];
        let allowed = specs.iter().map(|s| s.id.clone()).collect();
        Self { specs, allowed }
    }
}

/// Load and validate a lot table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_lot_table(path: &Path) -> Result<LotTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LotsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_lot_table(&content)
}

pub(crate) fn parse_lot_table(content: &str) -> Result<LotTable, ConfigError> {
    let file: LotsFile = serde_yaml::from_str(content)?;
    LotTable::new(file.lots)
}

fn validate_specs(specs: Vec<LotSpec>) -> Result<Vec<LotSpec>, ConfigError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(specs.len());

    for mut spec in specs {
        let id = lot_id_from_key(&spec.id);
        if id.is_empty() {
            return Err(ConfigError::Validation(format!(
                "lot id '{}' contains no letters",
                spec.id
            )));
        }
        if !seen.insert(id.clone()) {
            return Err(ConfigError::Validation(format!("duplicate lot id: '{id}'")));
        }
        if let Some(pos) = spec.position {
            if pos.x > 100 || pos.y > 100 {
                return Err(ConfigError::Validation(format!(
                    "lot '{id}' position ({}, {}) is outside the 0-100 map",
                    pos.x, pos.y
                )));
            }
        }
        if spec.capacity == Some(0) {
            return Err(ConfigError::Validation(format!(
                "lot '{id}' capacity must be positive"
            )));
        }
        spec.id = id;
        out.push(spec);
    }

    Ok(out)
}
