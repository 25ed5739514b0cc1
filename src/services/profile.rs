// src/services/profile.rs

//! Profile snapshot loading.
//!
//! One fetch of the target user's profile page yields two things: the
//! current reputation score and a seed list of threads the user was active
//! in within the last hour. The profile page's shape is assumed stable; a
//! missing or non-numeric score row means the site changed underneath us
//! and the run cannot safely proceed.

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::ThreadRecord;
use crate::services::{Fetch, parse_selector};
use crate::utils::{resolve, time};

/// The score sits in the eighth row of the profile summary table.
const SCORE_ROW_INDEX: usize = 7;

/// What one profile fetch produces.
#[derive(Debug)]
pub struct ProfileSnapshot {
    /// Current reputation score
    pub score: i64,

    /// Threads with recent activity by the user, newest information the
    /// profile page can resolve to an absolute time
    pub seeds: Vec<ThreadRecord>,
}

/// Loads a reputation score and seed threads from a user profile page.
pub struct ProfileLoader<'a, F> {
    fetcher: &'a F,
    base_url: &'a str,
}

impl<'a, F: Fetch> ProfileLoader<'a, F> {
    pub fn new(fetcher: &'a F, base_url: &'a str) -> Self {
        Self { fetcher, base_url }
    }

    pub async fn load(&self, profile_url: &str, now: NaiveDateTime) -> Result<ProfileSnapshot> {
        let doc = self.fetcher.fetch(profile_url).await?;

        let table_sel = parse_selector("table")?;
        let row_sel = parse_selector("tr")?;
        let link_sel = parse_selector("a")?;

        let table = doc
            .select(&table_sel)
            .next()
            .ok_or_else(|| AppError::profile("no summary table on profile page"))?;
        let rows: Vec<_> = table.select(&row_sel).collect();

        let score_row = rows
            .get(SCORE_ROW_INDEX)
            .ok_or_else(|| AppError::profile("summary table shorter than expected"))?;
        let score_text: String = score_row.text().collect();
        let score = trailing_number(&score_text).ok_or_else(|| {
            AppError::profile(format!("score row is not numeric: {:?}", score_text.trim()))
        })?;

        let mut seeds = Vec::new();
        for row in &rows {
            let Some(link) = row.select(&link_sel).next() else {
                continue;
            };
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            // Only minutes-fresh rows resolve to an absolute time; older
            // activity is deliberately excluded from seeding.
            let row_text: String = row.text().collect();
            let Some(activity) = time::parse_posted_minutes(&row_text, now) else {
                continue;
            };

            let title: String = link.text().collect::<String>().trim().to_string();
            let url = resolve(self.base_url, href);
            log::debug!("Profile seed thread: {}", url);
            seeds.push(ThreadRecord::new(url, title, activity));
        }

        log::info!("Profile snapshot: score {}, {} seed threads", score, seeds.len());
        Ok(ProfileSnapshot { score, seeds })
    }
}

/// Trailing integer of a label/value row like "Karma 1234".
fn trailing_number(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let re = Regex::new(r"(\d+)\s*$").expect("static pattern");
    re.captures(trimmed)?.get(1)?.as_str().parse().ok()
}
