// src/services/board.rs

//! Watermark-bounded thread listing.
//!
//! Walks a board's pages in order, emitting a [`ThreadRecord`] for every row
//! whose last-activity time is strictly newer than the watermark. The board
//! lists rows newest-first, so a page where some rows fail the watermark test
//! means everything after it is older too and the walk stops early.

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::ThreadRecord;
use crate::services::{Fetch, page_count, parse_selector};
use crate::utils::{resolve, time};

/// Lists threads on a board with activity newer than a watermark.
pub struct ThreadLister<'a, F> {
    fetcher: &'a F,
    base_url: &'a str,
    board_url: &'a str,
}

impl<'a, F: Fetch> ThreadLister<'a, F> {
    pub fn new(fetcher: &'a F, base_url: &'a str, board_url: &'a str) -> Self {
        Self {
            fetcher,
            base_url,
            board_url,
        }
    }

    /// Scan the board and return records for threads active after `watermark`.
    ///
    /// Records come back in page order, then row order within a page.
    pub async fn run(
        &self,
        watermark: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Vec<ThreadRecord>> {
        let mut doc = self.fetcher.fetch(self.board_url).await?;
        let pages = page_count(&doc)?;
        let mut found = Vec::new();

        for page in 0..pages {
            if page > 0 {
                let url = format!("{}?page={}", self.board_url, page);
                doc = self.fetcher.fetch(&url).await?;
            }

            let (qualifying, total) = self.scan_page(&doc, watermark, now, &mut found)?;
            log::debug!(
                "Board page {}: {} of {} rows newer than watermark",
                page,
                qualifying,
                total
            );

            // Rows are newest-first; a page with any stale row ends the walk.
            if qualifying < total {
                break;
            }
        }

        log::info!("{} new threads found on board", found.len());
        Ok(found)
    }

    /// Scan one page; returns (qualifying rows, total rows).
    fn scan_page(
        &self,
        doc: &Html,
        watermark: NaiveDateTime,
        now: NaiveDateTime,
        out: &mut Vec<ThreadRecord>,
    ) -> Result<(usize, usize)> {
        let lastpost_sel = parse_selector("td.lastpost")?;
        let topic_sel = parse_selector("td.topic a")?;

        let mut total = 0;
        let mut qualifying = 0;

        for cell in doc.select(&lastpost_sel) {
            total += 1;

            let cell_text: String = cell.text().collect();
            let Some(activity) = time::parse_board_timestamp(&cell_text, now) else {
                continue;
            };
            if activity <= watermark {
                continue;
            }

            // The topic link lives in a sibling cell of the same row.
            let Some(row) = cell.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            let Some(link) = row.select(&topic_sel).next() else {
                continue;
            };
            let Some(href) = link.value().attr("href") else {
                continue;
            };

            let title: String = link.text().collect::<String>().trim().to_string();
            log::debug!("Thread found: {} ({})", title, cell_text.trim());

            qualifying += 1;
            out.push(ThreadRecord::new(
                resolve(self.base_url, href),
                title,
                activity,
            ));
        }

        Ok((qualifying, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::PageMap;
    use chrono::NaiveDate;

    const BASE: &str = "https://forum.example.com";
    const BOARD: &str = "https://forum.example.com/boards/400-current-events";

    fn at(h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn row(href: &str, title: &str, lastpost: &str) -> String {
        format!(
            r#"<tr><td class="topic"><a href="{href}">{title}</a></td><td class="lastpost">{lastpost}</td></tr>"#
        )
    }

    fn board_page(rows: &[String], paginate: Option<&str>) -> String {
        let paginate = paginate
            .map(|p| format!(r#"<ul class="paginate"><li>{p}</li></ul>"#))
            .unwrap_or_default();
        format!(
            "<html><body>{paginate}<table>{}</table></body></html>",
            rows.concat()
        )
    }

    #[tokio::test]
    async fn test_emits_iff_newer_than_watermark() {
        let mut pages = PageMap::new();
        pages.insert(
            BOARD,
            board_page(
                &[
                    row("/boards/400/1", "Fresh", "1/1 12:10PM"),
                    row("/boards/400/2", "Fresher", "1/1 12:05PM"),
                    row("/boards/400/3", "Stale", "1/1 11:50AM"),
                ],
                None,
            ),
        );

        let lister = ThreadLister::new(&pages, BASE, BOARD);
        let found = lister.run(at(12, 0), at(12, 30)).await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].title, "Fresh");
        assert_eq!(found[0].url, "https://forum.example.com/boards/400/1");
        assert_eq!(found[0].last_activity, at(12, 10));
        assert_eq!(found[1].title, "Fresher");
    }

    #[tokio::test]
    async fn test_early_stop_skips_next_page() {
        let mut pages = PageMap::new();
        // Page 0 claims 3 pages, but one of its rows is stale.
        pages.insert(
            BOARD,
            board_page(
                &[
                    row("/t/1", "New", "1/1 12:10PM"),
                    row("/t/2", "Old", "1/1 11:00AM"),
                ],
                Some("Page 1 of 3"),
            ),
        );

        let lister = ThreadLister::new(&pages, BASE, BOARD);
        let found = lister.run(at(12, 0), at(12, 30)).await.unwrap();

        assert_eq!(found.len(), 1);
        // Only the first page was ever fetched.
        assert_eq!(pages.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_continues_while_all_rows_qualify() {
        let mut pages = PageMap::new();
        pages.insert(
            BOARD,
            board_page(&[row("/t/1", "A", "1/1 12:20PM")], Some("Page 1 of 2")),
        );
        pages.insert(
            format!("{BOARD}?page=1"),
            board_page(
                &[row("/t/2", "B", "1/1 12:10PM"), row("/t/3", "C", "1/1 11:00AM")],
                Some("Page 2 of 2"),
            ),
        );

        let lister = ThreadLister::new(&pages, BASE, BOARD);
        let found = lister.run(at(12, 0), at(12, 30)).await.unwrap();

        assert_eq!(pages.fetch_count(), 2);
        assert_eq!(
            found.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
    }

    #[tokio::test]
    async fn test_single_page_board_ignores_counts() {
        let mut pages = PageMap::new();
        pages.insert(BOARD, board_page(&[row("/t/1", "A", "1/1 12:20PM")], None));

        let lister = ThreadLister::new(&pages, BASE, BOARD);
        let found = lister.run(at(12, 0), at(12, 30)).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(pages.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_relative_minutes_cell() {
        let mut pages = PageMap::new();
        pages.insert(
            BOARD,
            board_page(&[row("/t/1", "A", "5 minutes ago")], None),
        );

        let lister = ThreadLister::new(&pages, BASE, BOARD);
        let found = lister.run(at(12, 0), at(12, 30)).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_activity, at(12, 25));
    }
}
