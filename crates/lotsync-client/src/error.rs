use thiserror::Error;

/// Errors returned while fetching occupancy from the backend.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend rejected the API key (HTTP 401).
    #[error("unauthorized: API key rejected")]
    Unauthorized,

    /// Any other non-2xx response.
    #[error("unexpected HTTP status {status} {status_text}")]
    FetchFailed { status: u16, status_text: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL cannot be parsed.
    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// A 2xx response whose body is not JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// The single message shown to the user for a failed poll cycle.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Unauthorized => "Unauthorized: Invalid or missing API key".to_string(),
            FetchError::FetchFailed {
                status,
                status_text,
            } => format!("Failed to fetch parking data: {status} {status_text}")
                .trim_end()
                .to_string(),
            FetchError::Network(e) => format!("Network error: {e}"),
            FetchError::InvalidBaseUrl { base_url, .. } => {
                format!("Invalid API base URL: {base_url}")
            }
            FetchError::Deserialize { source, .. } => {
                format!("Failed to read parking data: {source}")
            }
        }
    }
}

/// Errors from driving a [`crate::PollScheduler`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,

    #[error("scheduler has been stopped and cannot be restarted")]
    AlreadyStopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_message_is_fixed() {
        assert_eq!(
            FetchError::Unauthorized.user_message(),
            "Unauthorized: Invalid or missing API key"
        );
    }

    #[test]
    fn fetch_failed_message_carries_status_and_text() {
        let err = FetchError::FetchFailed {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Failed to fetch parking data: 503 Service Unavailable"
        );
    }

    #[test]
    fn fetch_failed_message_without_reason_has_no_trailing_space() {
        let err = FetchError::FetchFailed {
            status: 599,
            status_text: String::new(),
        };
        assert_eq!(err.user_message(), "Failed to fetch parking data: 599");
    }

    #[test]
    fn deserialize_message_mentions_parse_failure() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = FetchError::Deserialize {
            context: "getLotCount".to_string(),
            source,
        };
        assert!(err
            .user_message()
            .starts_with("Failed to read parking data:"));
    }
}
