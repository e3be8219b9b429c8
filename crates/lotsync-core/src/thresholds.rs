//! Occupancy color buckets.
//!
//! A single [`Thresholds`] value is the source of truth for cards, the
//! legend and map markers; nothing else compares raw percentages.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyBucket {
    Open,
    Busy,
    Full,
}

impl OccupancyBucket {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OccupancyBucket::Open => "open",
            OccupancyBucket::Busy => "busy",
            OccupancyBucket::Full => "full",
        }
    }

    #[must_use]
    pub fn color_name(self) -> &'static str {
        match self {
            OccupancyBucket::Open => "green",
            OccupancyBucket::Busy => "yellow",
            OccupancyBucket::Full => "red",
        }
    }

    #[must_use]
    pub fn hex_color(self) -> &'static str {
        match self {
            OccupancyBucket::Open => "#22c55e",
            OccupancyBucket::Busy => "#f59e0b",
            OccupancyBucket::Full => "#ef4444",
        }
    }
}

impl std::fmt::Display for OccupancyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive upper bounds for the open and busy buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    open_max: u8,
    busy_max: u8,
}

impl Thresholds {
    pub const DEFAULT_OPEN_MAX: u8 = 60;
    pub const DEFAULT_BUSY_MAX: u8 = 85;

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] unless `open_max < busy_max <= 100`.
    pub fn new(open_max: u8, busy_max: u8) -> Result<Self, ConfigError> {
        if open_max >= busy_max || busy_max > 100 {
            return Err(ConfigError::Validation(format!(
                "thresholds must satisfy open_max < busy_max <= 100 (got {open_max}/{busy_max})"
            )));
        }
        Ok(Self { open_max, busy_max })
    }

    #[must_use]
    pub fn open_max(&self) -> u8 {
        self.open_max
    }

    #[must_use]
    pub fn busy_max(&self) -> u8 {
        self.busy_max
    }

    #[must_use]
    pub fn bucket(&self, occupancy_pct: u8) -> OccupancyBucket {
        if occupancy_pct <= self.open_max {
            OccupancyBucket::Open
        } else if occupancy_pct <= self.busy_max {
            OccupancyBucket::Busy
        } else {
            OccupancyBucket::Full
        }
    }

    /// Legend rows, one per bucket, in open → busy → full order.
    #[must_use]
    pub fn legend(&self) -> [(OccupancyBucket, String); 3] {
        [
            (OccupancyBucket::Open, format!("\u{2264}{}%", self.open_max)),
            (
                OccupancyBucket::Busy,
                format!("{}\u{2013}{}%", self.open_max + 1, self.busy_max),
            ),
            (OccupancyBucket::Full, format!(">{}%", self.busy_max)),
        ]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            open_max: Self::DEFAULT_OPEN_MAX,
            busy_max: Self::DEFAULT_BUSY_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_boundaries_are_inclusive() {
        let t = Thresholds::default();
        assert_eq!(t.bucket(0), OccupancyBucket::Open);
        assert_eq!(t.bucket(60), OccupancyBucket::Open);
        assert_eq!(t.bucket(61), OccupancyBucket::Busy);
        assert_eq!(t.bucket(85), OccupancyBucket::Busy);
        assert_eq!(t.bucket(86), OccupancyBucket::Full);
        assert_eq!(t.bucket(100), OccupancyBucket::Full);
    }

    #[test]
    fn custom_thresholds_shift_every_bucket() {
        let t = Thresholds::new(50, 75).unwrap();
        assert_eq!(t.bucket(51), OccupancyBucket::Busy);
        assert_eq!(t.bucket(76), OccupancyBucket::Full);
        assert_eq!(t.legend()[1].1, "51\u{2013}75%");
    }

    #[test]
    fn rejects_inverted_or_out_of_range_bounds() {
        assert!(Thresholds::new(85, 60).is_err());
        assert!(Thresholds::new(60, 60).is_err());
        assert!(Thresholds::new(60, 101).is_err());
    }

    #[test]
    fn legend_matches_defaults() {
        let legend = Thresholds::default().legend();
        assert_eq!(legend[0], (OccupancyBucket::Open, "\u{2264}60%".to_string()));
        assert_eq!(legend[1], (OccupancyBucket::Busy, "61\u{2013}85%".to_string()));
        assert_eq!(legend[2], (OccupancyBucket::Full, ">85%".to_string()));
    }

    #[test]
    fn bucket_colors_follow_palette() {
        assert_eq!(OccupancyBucket::Open.color_name(), "green");
        assert_eq!(OccupancyBucket::Full.hex_color(), "#ef4444");
        assert_eq!(OccupancyBucket::Busy.to_string(), "busy");
    }
}
