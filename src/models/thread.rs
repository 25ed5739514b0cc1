//! Thread record data structure.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A discussion thread discovered on the board or the target's profile page.
///
/// Records are appended to the crawl session's thread list and never removed
/// within a run; profile-derived seeds come first, then board finds in page
/// and row order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadRecord {
    /// Full URL to the thread's first page
    pub url: String,

    /// Thread title as shown in the board listing
    pub title: String,

    /// Timestamp of the thread's most recent activity
    pub last_activity: NaiveDateTime,
}

impl ThreadRecord {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        last_activity: NaiveDateTime,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            last_activity,
        }
    }
}
