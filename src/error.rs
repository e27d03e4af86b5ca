// Error types for roster.
// Covers GitHub API failures, cache storage errors, and pipeline failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepo(String),

    /// A contributors page could not be retrieved; the whole fetch is abandoned.
    #[error("Fetching contributors page {page} failed")]
    PageFetch {
        page: u32,
        #[source]
        source: Box<RosterError>,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl RosterError {
    /// Whether this error (or the page failure it wraps) came from rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            RosterError::RateLimited { .. } => true,
            RosterError::PageFetch { source, .. } => source.is_rate_limited(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_page_fetch_reports_cause_once() {
        let err = RosterError::PageFetch {
            page: 2,
            source: Box::new(RosterError::Other("HTTP 502".to_string())),
        };

        assert_eq!(err.to_string(), "Fetching contributors page 2 failed");
        let cause = err.source().expect("page failure keeps its cause");
        assert_eq!(cause.to_string(), "HTTP 502");
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_rate_limit_seen_through_page_fetch() {
        let err = RosterError::PageFetch {
            page: 1,
            source: Box::new(RosterError::RateLimited {
                reset_at: "12:00:00".to_string(),
            }),
        };
        assert!(err.is_rate_limited());
    }
}
