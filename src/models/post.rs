//! Post record data structure.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single post by the target user, extracted from a thread page.
///
/// Created at most once per post container and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostRecord {
    /// Serialized markup of the post, with navigation elements stripped
    pub body_fragment: String,

    /// URL of the thread page the post was found on
    pub thread_url: String,

    /// Thread title, taken from the page title with the site suffix stripped
    pub thread_title: String,

    /// Exact time the post was made
    pub posted_at: NaiveDateTime,

    /// The site's own display string for `posted_at`
    pub posted_at_display: String,
}
