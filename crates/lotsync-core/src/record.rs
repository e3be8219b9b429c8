use serde::{Deserialize, Serialize};

/// One parking lot's occupancy after normalization.
///
/// Serializes with the backend's wire field names so a canonical list can be
/// fed back through [`crate::Pipeline::run`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotRecord {
    #[serde(rename = "lot")]
    pub lot_id: String,
    pub occupancy_pct: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_spaces: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_spaces: Option<u32>,
}

impl LotRecord {
    /// Builds a record from a raw lot key, deriving the canonical id.
    #[must_use]
    pub fn from_key(key: &str, occupancy_pct: u8) -> Self {
        Self {
            lot_id: lot_id_from_key(key),
            occupancy_pct,
            available_spaces: None,
            capacity: None,
            occupied_spaces: None,
        }
    }
}

/// Derives a lot id from a raw key: keeps ASCII letters only, upper-cased.
///
/// `"g"` → `"G"`, `"lot-h2"` → `"LOTH"`, `"42"` → `""`.
#[must_use]
pub fn lot_id_from_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lot_id_uppercases_letters() {
        assert_eq!(lot_id_from_key("g"), "G");
        assert_eq!(lot_id_from_key("Jm"), "JM");
    }

    #[test]
    fn lot_id_strips_everything_but_letters() {
        assert_eq!(lot_id_from_key(" lot-h2 "), "LOTH");
        assert_eq!(lot_id_from_key("M!"), "M");
        assert_eq!(lot_id_from_key("42"), "");
    }

    #[test]
    fn lot_id_drops_non_ascii_letters() {
        assert_eq!(lot_id_from_key("Ĝ"), "");
        assert_eq!(lot_id_from_key("gé"), "G");
    }

    #[test]
    fn serializes_with_wire_names_and_skips_unknown_counts() {
        let record = LotRecord::from_key("g", 45);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, serde_json::json!({ "lot": "G", "occupancy_pct": 45 }));
    }
}
