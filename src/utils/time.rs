// src/utils/time.rs

//! Timestamp parsing rules for the forum's display formats.
//!
//! The site shows times in three shapes, none of them self-contained:
//!
//! - Board listings: either a relative `"N minutes ago"` or an abbreviated
//!   `"MM/DD H:MMam"` with no year.
//! - Thread pages: a full `"MM/DD/YYYY H:MM:SS AM"` in the post time tooltip,
//!   with non-breaking spaces.
//! - Profile rows: a `"Posted N minutes"` marker.
//!
//! Each format gets one pure function here so that upstream format drift
//! breaks a single obvious unit test instead of corrupting the crawl.

use chrono::{Datelike, Duration, NaiveDateTime};
use regex::Regex;

/// Persisted watermark format, the site's own minute-precision style.
const WATERMARK_FORMAT: &str = "%m/%d/%y %I:%M%p";

/// Full post timestamp format used in thread page tooltips.
const POST_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Parse a board listing's "last activity" cell.
///
/// Handles both display shapes. The abbreviated date omits the year; it is
/// taken as the nearest past occurrence of that month/day relative to `now`.
pub fn parse_board_timestamp(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Some(ts) = parse_relative_minutes(text, now) {
        return Some(ts);
    }
    parse_board_absolute(text, now)
}

/// Parse a thread page's full post timestamp (tooltip text).
///
/// The site pads these with non-breaking spaces; callers may pass the raw
/// attribute value.
pub fn parse_post_timestamp(text: &str) -> Option<NaiveDateTime> {
    let cleaned = text.replace('\u{a0}', " ");
    NaiveDateTime::parse_from_str(cleaned.trim(), POST_FORMAT).ok()
}

/// Parse a profile row's "Posted N minutes" marker into an absolute time.
///
/// Rows without the marker carry older, non-resolvable activity and yield
/// `None`.
pub fn parse_posted_minutes(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let re = Regex::new(r"Posted (\d+) minutes?").expect("static pattern");
    let minutes: i64 = re.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(now - Duration::minutes(minutes))
}

/// Format a watermark for persistence.
pub fn format_watermark(ts: NaiveDateTime) -> String {
    ts.format(WATERMARK_FORMAT).to_string()
}

/// Parse a persisted watermark string.
pub fn parse_watermark(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), WATERMARK_FORMAT).ok()
}

fn parse_relative_minutes(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let re = Regex::new(r"^(\d+) minutes? ago$").expect("static pattern");
    let minutes: i64 = re.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some(now - Duration::minutes(minutes))
}

fn parse_board_absolute(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (date, time) = text.split_once(' ')?;
    let candidate = parse_with_year(date, time, now.year())?;
    if candidate <= now {
        return Some(candidate);
    }
    // A future month/day means the activity was late last year.
    parse_with_year(date, time, now.year() - 1)
}

fn parse_with_year(date: &str, time: &str, year: i32) -> Option<NaiveDateTime> {
    let composed = format!("{date}/{year} {time}");
    NaiveDateTime::parse_from_str(&composed, "%m/%d/%Y %I:%M%p").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_board_relative_minutes() {
        let now = at(2024, 6, 15, 12, 0);
        assert_eq!(
            parse_board_timestamp("7 minutes ago", now),
            Some(at(2024, 6, 15, 11, 53))
        );
        assert_eq!(
            parse_board_timestamp("1 minute ago", now),
            Some(at(2024, 6, 15, 11, 59))
        );
    }

    #[test]
    fn test_board_absolute_same_year() {
        let now = at(2024, 6, 15, 12, 0);
        assert_eq!(
            parse_board_timestamp("6/14 4:30PM", now),
            Some(at(2024, 6, 14, 16, 30))
        );
        // Lowercase meridiem, as the board actually renders it.
        assert_eq!(
            parse_board_timestamp("6/14 4:30pm", now),
            Some(at(2024, 6, 14, 16, 30))
        );
    }

    #[test]
    fn test_board_absolute_rolls_back_a_year() {
        // A December date seen in January belongs to the previous year.
        let now = at(2024, 1, 2, 9, 0);
        assert_eq!(
            parse_board_timestamp("12/30 11:15PM", now),
            Some(at(2023, 12, 30, 23, 15))
        );
    }

    #[test]
    fn test_board_garbage_is_none() {
        let now = at(2024, 6, 15, 12, 0);
        assert_eq!(parse_board_timestamp("Sticky", now), None);
        assert_eq!(parse_board_timestamp("", now), None);
    }

    #[test]
    fn test_post_timestamp() {
        assert_eq!(
            parse_post_timestamp("6/14/2024 4:30:07 PM"),
            Some(
                NaiveDate::from_ymd_opt(2024, 6, 14)
                    .unwrap()
                    .and_hms_opt(16, 30, 7)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_post_timestamp_with_nbsp() {
        assert_eq!(
            parse_post_timestamp("6/14/2024\u{a0}4:30:07\u{a0}PM"),
            parse_post_timestamp("6/14/2024 4:30:07 PM")
        );
    }

    #[test]
    fn test_posted_minutes_marker() {
        let now = at(2024, 6, 15, 12, 0);
        assert_eq!(
            parse_posted_minutes("Posted 12 minutes ago in some thread", now),
            Some(at(2024, 6, 15, 11, 48))
        );
        assert_eq!(parse_posted_minutes("Posted 3 hours ago", now), None);
    }

    #[test]
    fn test_watermark_round_trip() {
        let ts = at(2024, 1, 1, 12, 0);
        let formatted = format_watermark(ts);
        assert_eq!(formatted, "01/01/24 12:00PM");
        assert_eq!(parse_watermark(&formatted), Some(ts));
    }
}
