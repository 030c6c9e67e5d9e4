//! Failure modes of the calendar fetch path.
//!
//! Field-level problems (missing columns, unparseable dates, NaN cells) are
//! never errors; they degrade to placeholders during normalization. Only the
//! upstream call itself can fail a request.

use thiserror::Error;

/// Errors surfaced when the calendar has to go upstream for fresh data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No upstream data source is configured for this process.
    #[error("upstream data source is not available")]
    UpstreamUnavailable,

    /// The upstream call failed at runtime (network, provider, decoding).
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
}

impl FetchError {
    /// Wraps any fetch-time failure, keeping the full error chain as text.
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        Self::UpstreamFetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_wraps_message() {
        let err = FetchError::fetch("connection refused");
        assert!(matches!(&err, FetchError::UpstreamFetch(m) if m == "connection refused"));
        assert_eq!(err.to_string(), "upstream fetch failed: connection refused");
    }
}
