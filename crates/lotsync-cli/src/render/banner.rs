use chrono::{DateTime, Utc};
use lotsync_client::SyncStatus;

/// Dismissible error banner.
///
/// A dismissal only hides the failure it was made on; the next failed poll
/// brings the banner back, and a successful poll clears it.
#[derive(Debug, Default)]
pub(crate) struct ErrorBanner {
    message: Option<String>,
    failed_at: Option<DateTime<Utc>>,
    dismissed: bool,
}

impl ErrorBanner {
    pub(crate) fn observe(&mut self, status: &SyncStatus) {
        match status {
            SyncStatus::Failed {
                message, failed_at, ..
            } => {
                if self.failed_at != Some(*failed_at) {
                    self.message = Some(message.clone());
                    self.failed_at = Some(*failed_at);
                    self.dismissed = false;
                }
            }
            SyncStatus::Loading | SyncStatus::Ready(_) => {
                self.message = None;
                self.failed_at = None;
                self.dismissed = false;
            }
        }
    }

    pub(crate) fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub(crate) fn visible(&self) -> Option<&str> {
        if self.dismissed {
            None
        } else {
            self.message.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn failed(secs: i64) -> SyncStatus {
        SyncStatus::Failed {
            message: "Unauthorized: Invalid or missing API key".to_string(),
            failed_at: Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap(),
            last_good: None,
        }
    }

    #[test]
    fn shows_on_failure_and_hides_after_dismiss() {
        let mut banner = ErrorBanner::default();
        banner.observe(&failed(0));
        assert_eq!(
            banner.visible(),
            Some("Unauthorized: Invalid or missing API key")
        );
        banner.dismiss();
        assert_eq!(banner.visible(), None);
    }

    #[test]
    fn same_failure_stays_dismissed() {
        let mut banner = ErrorBanner::default();
        banner.observe(&failed(0));
        banner.dismiss();
        banner.observe(&failed(0));
        assert_eq!(banner.visible(), None);
    }

    #[test]
    fn next_failure_reappears() {
        let mut banner = ErrorBanner::default();
        banner.observe(&failed(0));
        banner.dismiss();
        banner.observe(&failed(30));
        assert!(banner.visible().is_some());
    }

    #[test]
    fn success_clears() {
        let mut banner = ErrorBanner::default();
        banner.observe(&failed(0));
        banner.observe(&SyncStatus::Loading);
        assert_eq!(banner.visible(), None);
    }
}
