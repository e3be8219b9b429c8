use chrono::{DateTime, Utc};
use lotsync_core::LotRecord;

use crate::error::FetchError;

/// Records from one successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub records: Vec<LotRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// What the presenter should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// No poll has completed yet.
    #[default]
    Loading,
    /// The most recent poll succeeded. An empty snapshot means "no data".
    Ready(Snapshot),
    /// The most recent poll failed. `last_good` keeps the previous records
    /// on screen; it is `None` until the first success.
    Failed {
        message: String,
        failed_at: DateTime<Utc>,
        last_good: Option<Snapshot>,
    },
}

impl SyncStatus {
    /// The snapshot to display, if any poll has ever succeeded.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            SyncStatus::Loading => None,
            SyncStatus::Ready(snapshot) => Some(snapshot),
            SyncStatus::Failed { last_good, .. } => last_good.as_ref(),
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SyncStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, SyncStatus::Loading)
    }

    /// Folds one cycle's outcome into the status.
    ///
    /// Success replaces everything; failure keeps whatever snapshot was on
    /// screen. `Loading` is never re-entered.
    pub fn apply(&mut self, outcome: Result<Vec<LotRecord>, FetchError>, now: DateTime<Utc>) {
        *self = match outcome {
            Ok(records) => SyncStatus::Ready(Snapshot {
                records,
                fetched_at: now,
            }),
            Err(err) => {
                let last_good = match std::mem::take(self) {
                    SyncStatus::Loading => None,
                    SyncStatus::Ready(snapshot) => Some(snapshot),
                    SyncStatus::Failed { last_good, .. } => last_good,
                };
                SyncStatus::Failed {
                    message: err.user_message(),
                    failed_at: now,
                    last_good,
                }
            }
        };
    }
}
