// ABOUTME: Shared provider plumbing: date normalization and query window defaults
// ABOUTME: Bare dates widen to full-day spans; absent WHOOP dates default to a trailing week

//! Common provider request helpers

use crate::constants::defaults;
use chrono::{Duration, Utc};

/// Widen a bare `YYYY-MM-DD` start date to the beginning of that day
///
/// An already-qualified datetime string passes through unchanged.
#[must_use]
pub fn widen_start(date: &str) -> String {
    if date.len() == 10 {
        format!("{date}T00:00:00.000Z")
    } else {
        date.to_owned()
    }
}

/// Widen a bare `YYYY-MM-DD` end date to the last instant of that day
///
/// An already-qualified datetime string passes through unchanged.
#[must_use]
pub fn widen_end(date: &str) -> String {
    if date.len() == 10 {
        format!("{date}T23:59:59.999Z")
    } else {
        date.to_owned()
    }
}

/// An optional start/end date pair as supplied by a caller
#[derive(Debug, Clone, Default)]
pub struct DateRange {
    /// Start date, `YYYY-MM-DD` or full datetime
    pub start: Option<String>,
    /// End date, `YYYY-MM-DD` or full datetime
    pub end: Option<String>,
}

impl DateRange {
    /// Create a range from optional caller-supplied dates
    #[must_use]
    pub const fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    /// Resolve into concrete widened start/end strings
    ///
    /// When either bound is absent, the range defaults to a trailing window of
    /// [`defaults::LOOKBACK_DAYS`] days ending now (UTC), at day granularity.
    #[must_use]
    pub fn resolve(&self) -> (String, String) {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => (widen_start(start), widen_end(end)),
            _ => {
                let end = Utc::now();
                let start = end - Duration::days(defaults::LOOKBACK_DAYS);
                (
                    widen_start(&start.format("%Y-%m-%d").to_string()),
                    widen_end(&end.format("%Y-%m-%d").to_string()),
                )
            }
        }
    }

    /// Resolve into `start`/`end` query pairs for a provider request
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let (start, end) = self.resolve();
        vec![("start", start), ("end", end)]
    }
}
