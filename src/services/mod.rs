//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Authenticated fetching (`Session`, `Fetch`)
//! - Pagination resolution (`page_count`)
//! - Watermark-bounded thread listing (`ThreadLister`)
//! - Targeted post extraction (`PostExtractor`)
//! - Profile snapshot loading (`ProfileLoader`)

mod board;
mod pagination;
mod posts;
mod profile;
mod session;

pub use board::ThreadLister;
pub use pagination::page_count;
pub use posts::PostExtractor;
pub use profile::{ProfileLoader, ProfileSnapshot};
pub use session::{Fetch, Session};

use scraper::Selector;

use crate::error::{AppError, Result};

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Map-backed fake fetcher for exercising services against fixtures.

    use std::cell::RefCell;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use scraper::Html;

    use crate::error::{AppError, Result};
    use crate::services::Fetch;

    /// In-memory page store; records every URL it serves.
    #[derive(Default)]
    pub struct PageMap {
        pages: HashMap<String, String>,
        pub fetched: RefCell<Vec<String>>,
    }

    impl PageMap {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
            self.pages.insert(url.into(), html.into());
        }

        pub fn fetch_count(&self) -> usize {
            self.fetched.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl Fetch for PageMap {
        async fn fetch(&self, url: &str) -> Result<Html> {
            self.fetched.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .map(|html| Html::parse_document(html))
                .ok_or_else(|| AppError::config(format!("no fixture for {url}")))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_page_map_records_fetches() {
            let mut pages = PageMap::new();
            pages.insert("https://x/1", "<p>one</p>");
            assert!(pages.fetch("https://x/1").await.is_ok());
            assert!(pages.fetch("https://x/2").await.is_err());
            assert_eq!(
                *pages.fetched.borrow(),
                vec!["https://x/1".to_string(), "https://x/2".to_string()]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("td.lastpost").is_ok());
        assert!(parse_selector("tr:has(a)").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }
}
