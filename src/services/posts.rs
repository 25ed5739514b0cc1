// src/services/posts.rs

//! Targeted post extraction.
//!
//! For every listed thread, walks each of the thread's pages looking for text
//! occurrences of the target identity, climbs to the enclosing post container
//! and emits a [`PostRecord`] when the post is newer than the watermark.
//! Unlike the board walk there is no early stop here: every page of every
//! listed thread is scanned, which makes this the dominant cost of a run.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html};

use crate::error::{AppError, Result};
use crate::models::{PostRecord, ThreadRecord};
use crate::services::{Fetch, page_count, parse_selector};
use crate::utils::{dom, time};

/// Extracts the target user's posts from listed threads.
pub struct PostExtractor<'a, F> {
    fetcher: &'a F,
    target: &'a str,
    title_suffix: &'a str,
}

impl<'a, F: Fetch> PostExtractor<'a, F> {
    pub fn new(fetcher: &'a F, target: &'a str, title_suffix: &'a str) -> Self {
        Self {
            fetcher,
            target,
            title_suffix,
        }
    }

    /// Scan every page of every thread for posts by the target user newer
    /// than `watermark`.
    ///
    /// Calling this with an empty thread list is a caller bug and yields a
    /// distinct not-ready error instead of a silently empty result.
    pub async fn run(
        &self,
        threads: &[ThreadRecord],
        watermark: NaiveDateTime,
    ) -> Result<Vec<PostRecord>> {
        if threads.is_empty() {
            return Err(AppError::not_ready(
                "no threads listed; run the profile loader and thread lister first",
            ));
        }

        let mut records = Vec::new();
        let mut pages_checked = 0usize;

        for thread in threads {
            let mut doc = self.fetcher.fetch(&thread.url).await?;
            // A thread's pagination is unrelated to the board's.
            let pages = page_count(&doc)?;

            for page in 0..pages {
                let page_url = if page == 0 {
                    thread.url.clone()
                } else {
                    format!("{}?page={}", thread.url, page)
                };
                if page > 0 {
                    doc = self.fetcher.fetch(&page_url).await?;
                }

                pages_checked += 1;
                self.scan_page(&doc, &page_url, watermark, &mut records)?;
            }
        }

        log::info!(
            "{} pages checked, {} found containing {}",
            pages_checked,
            records.len(),
            self.target
        );
        Ok(records)
    }

    /// Extract qualifying posts from a single thread page.
    fn scan_page(
        &self,
        doc: &Html,
        page_url: &str,
        watermark: NaiveDateTime,
        out: &mut Vec<PostRecord>,
    ) -> Result<()> {
        let hits = dom::text_nodes_containing(doc, self.target);
        if hits.is_empty() {
            log::debug!("{} not found on {}", self.target, page_url);
            return Ok(());
        }

        let time_sel = parse_selector("span.post_time")?;
        let mut seen_containers = HashSet::new();

        for hit in hits {
            let Some(container) = dom::closest_ancestor(hit, "td", "msg") else {
                continue;
            };
            // One record per post, however often the identity string appears
            // inside the same container.
            if !seen_containers.insert(container.id()) {
                continue;
            }
            let Some(cell) = ElementRef::wrap(container) else {
                continue;
            };

            let Some(raw_time) = cell
                .select(&time_sel)
                .next()
                .and_then(|el| el.value().attr("title"))
            else {
                continue;
            };
            let display = raw_time.replace('\u{a0}', " ");
            let Some(posted_at) = time::parse_post_timestamp(&display) else {
                continue;
            };

            if posted_at <= watermark {
                log::debug!("Post at {} not newer than watermark", display);
                continue;
            }

            log::info!("Post found at {}", display);

            // The fragment is the whole post row, minus embedded navigation.
            let body_fragment = match container.parent() {
                Some(row) => dom::html_without_lists(row),
                None => dom::html_without_lists(container),
            };

            out.push(PostRecord {
                body_fragment,
                thread_url: page_url.to_string(),
                thread_title: self.page_title(doc)?,
                posted_at,
                posted_at_display: display,
            });
        }

        Ok(())
    }

    /// Thread display title: the page title with the site's fixed suffix
    /// stripped.
    fn page_title(&self, doc: &Html) -> Result<String> {
        let title_sel = parse_selector("title")?;
        Ok(doc
            .select(&title_sel)
            .next()
            .map(|el| {
                el.text()
                    .collect::<String>()
                    .replace(self.title_suffix, "")
                    .trim()
                    .to_string()
            })
            .unwrap_or_default())
    }
}
