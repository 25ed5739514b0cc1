// src/storage/mod.rs

//! Persisted run state: last reputation score and the crawl watermark.
//!
//! One small JSON file, written atomically (temp + rename) only after a run
//! completes. A missing file is the first-run case and yields defaults: score
//! zero and a watermark fifteen minutes in the past. The watermark is stored
//! in the site's own minute-precision display format.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::time;

/// How far back the first run looks.
const FIRST_RUN_LOOKBACK_MINUTES: i64 = 15;

/// State carried between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotState {
    /// Reputation score seen by the previous run
    pub last_score: i64,

    /// Exclusive lower bound for "new" activity
    pub watermark: NaiveDateTime,
}

impl BotState {
    /// First-run defaults.
    pub fn initial(now: NaiveDateTime) -> Self {
        Self {
            last_score: 0,
            watermark: now - Duration::minutes(FIRST_RUN_LOOKBACK_MINUTES),
        }
    }
}

/// On-disk shape of the state file.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    score: i64,
    checked_at: String,
}

/// Loads and saves the state file.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state, or first-run defaults if the file is absent.
    pub async fn load(&self) -> Result<BotState> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No state file at {:?}; starting fresh", self.path);
                return Ok(BotState::initial(Local::now().naive_local()));
            }
            Err(e) => return Err(e.into()),
        };

        let file: StateFile = serde_json::from_slice(&bytes)?;
        let watermark = time::parse_watermark(&file.checked_at).ok_or_else(|| {
            AppError::config(format!(
                "unreadable watermark {:?} in {:?}",
                file.checked_at, self.path
            ))
        })?;

        Ok(BotState {
            last_score: file.score,
            watermark,
        })
    }

    /// Persist the score and the new watermark atomically.
    pub async fn save(&self, score: i64, watermark: NaiveDateTime) -> Result<()> {
        let file = StateFile {
            score,
            checked_at: time::format_watermark(watermark),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        log::debug!("State saved to {:?}", self.path);
        Ok(())
    }
}
