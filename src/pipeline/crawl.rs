// src/pipeline/crawl.rs

//! The crawl pipeline: profile snapshot, thread listing, post extraction.
//!
//! Execution is strictly sequential; every fetch completes before the next
//! step runs. A fatal error anywhere aborts the run before any state is
//! persisted or a digest is sent, so the next run retries from the same
//! watermark.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::error::Result;
use crate::models::{PostRecord, ThreadRecord};
use crate::services::{Fetch, PostExtractor, ProfileLoader, ThreadLister};

/// Mutable state of one crawl run.
///
/// The watermark is read-only within a run; the thread list only grows
/// (profile seeds first, then board finds in page/row order); posts are
/// collected once by the extractor.
pub struct CrawlSession {
    pub target: String,
    pub watermark: NaiveDateTime,
    pub threads: Vec<ThreadRecord>,
    pub posts: Vec<PostRecord>,
    pub score: i64,
}

impl CrawlSession {
    pub fn new(target: impl Into<String>, watermark: NaiveDateTime) -> Self {
        Self {
            target: target.into(),
            watermark,
            threads: Vec::new(),
            posts: Vec::new(),
            score: 0,
        }
    }
}

/// What a completed run hands to the persistence and notification side.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub score: i64,
    pub posts: Vec<PostRecord>,
}

/// Run one full crawl against an authenticated fetcher.
pub async fn run_crawl(
    fetcher: &impl Fetch,
    config: &Config,
    target: &str,
    watermark: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<CrawlOutcome> {
    let mut session = CrawlSession::new(target, watermark);

    // Profile snapshot seeds the thread list and the score.
    let profile_url = config.site.profile_url_for(target);
    let loader = ProfileLoader::new(fetcher, &config.site.base_url);
    let snapshot = loader.load(&profile_url, now).await?;
    session.score = snapshot.score;
    session.threads = snapshot.seeds;

    // Board scan extends the list with freshly active threads.
    let lister = ThreadLister::new(fetcher, &config.site.base_url, &config.site.board_url);
    let fresh = lister.run(session.watermark, now).await?;
    session.threads.extend(fresh);
    log::info!("{} threads to scan", session.threads.len());

    // Extract the target's posts from every listed thread.
    let extractor = PostExtractor::new(fetcher, &session.target, &config.site.title_suffix);
    session.posts = extractor.run(&session.threads, session.watermark).await?;

    Ok(CrawlOutcome {
        score: session.score,
        posts: session.posts,
    })
}
