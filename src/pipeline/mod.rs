//! Pipeline entry points for crawler operations.

pub mod crawl;

pub use crawl::{CrawlOutcome, CrawlSession, run_crawl};
