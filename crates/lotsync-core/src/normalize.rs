//! Normalization of the loosely typed `getLotCount` body into candidate
//! [`LotRecord`]s.
//!
//! The body is classified once into a [`ResponseShape`]; each shape has its
//! own extraction path. Nothing here fails: shapes we do not recognise
//! produce an empty list.

use serde_json::{Map, Value};

use crate::app_config::MapSchema;
use crate::lots::LotTable;
use crate::record::{lot_id_from_key, LotRecord};

/// Lot key fields, highest priority first.
const LOT_KEY_FIELDS: [&str; 3] = ["lot", "name", "lotName"];

/// Occupancy fields, highest priority first.
const OCCUPANCY_FIELDS: [&str; 3] = ["occupancy_pct", "occupancy", "occupied_spaces"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Unrecognized,
}

impl<'a> ResponseShape<'a> {
    #[must_use]
    pub fn classify(body: &'a Value) -> Self {
        match body {
            Value::Array(items) => ResponseShape::Sequence(items),
            Value::Object(map) => ResponseShape::Mapping(map),
            _ => ResponseShape::Unrecognized,
        }
    }
}

/// Converts a raw response body into candidate records, before allow-list
/// filtering and ordering.
///
/// `lots` is only consulted for capacities when `schema` is
/// [`MapSchema::Available`].
#[must_use]
pub fn normalize_response(body: &Value, schema: MapSchema, lots: &LotTable) -> Vec<LotRecord> {
    match ResponseShape::classify(body) {
        ResponseShape::Sequence(items) => items.iter().map(normalize_item).collect(),
        ResponseShape::Mapping(map) => map
            .iter()
            .map(|(key, value)| normalize_entry(key, value, schema, lots))
            .collect(),
        ResponseShape::Unrecognized => {
            tracing::debug!(body = %body, "unrecognized lot response shape; treating as empty");
            Vec::new()
        }
    }
}

fn normalize_item(item: &Value) -> LotRecord {
    let key = LOT_KEY_FIELDS
        .iter()
        .find_map(|field| {
            item.get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("");

    let occupancy_pct = match OCCUPANCY_FIELDS
        .iter()
        .find_map(|field| item.get(field).filter(|v| !v.is_null()))
    {
        Some(raw) => percent_from(raw, key),
        None => {
            // Indistinguishable from an empty lot; the backend always sends it.
            tracing::debug!(lot = key, "lot record has no occupancy field; using 0%");
            0
        }
    };

    LotRecord {
        lot_id: lot_id_from_key(key),
        occupancy_pct,
        available_spaces: count_field(item, "available_spaces"),
        capacity: count_field(item, "capacity"),
        occupied_spaces: count_field(item, "occupied_spaces"),
    }
}

fn normalize_entry(key: &str, value: &Value, schema: MapSchema, lots: &LotTable) -> LotRecord {
    let mut record = LotRecord::from_key(key, 0);

    match schema {
        MapSchema::Percent => {
            record.occupancy_pct = percent_from(value, key);
        }
        MapSchema::Available => {
            let Some(available) = count_from(value) else {
                tracing::warn!(lot = key, value = %value, "non-numeric available-space count");
                return record;
            };
            record.available_spaces = Some(available);
            if let Some(capacity) = lots.capacity(&record.lot_id) {
                let occupied = capacity.saturating_sub(available);
                record.capacity = Some(capacity);
                record.occupied_spaces = Some(occupied);
                record.occupancy_pct = round_percent(f64::from(occupied) / f64::from(capacity) * 100.0);
            }
        }
    }

    record
}

/// Reads a JSON number or numeric string.
fn numeric(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|n| n.is_finite())
}

fn percent_from(value: &Value, key: &str) -> u8 {
    if let Some(n) = numeric(value) {
        round_percent(n)
    } else {
        tracing::warn!(lot = key, value = %value, "non-numeric occupancy value; using 0%");
        0
    }
}

/// Rounds half away from zero and clamps into `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_percent(n: f64) -> u8 {
    n.round().clamp(0.0, 100.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_from(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    numeric(value)
        .map(f64::round)
        .filter(|n| (0.0..=f64::from(u32::MAX)).contains(n))
        .map(|n| n as u32)
}

fn count_field(item: &Value, field: &str) -> Option<u32> {
    item.get(field).and_then(count_from)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
