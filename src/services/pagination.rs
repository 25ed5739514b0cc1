// src/services/pagination.rs

//! Pagination resolution for board and thread pages.

use regex::Regex;
use scraper::Html;

use crate::error::Result;
use crate::services::parse_selector;

/// Number of pages a board or thread spans, per its pagination indicator.
///
/// Absent or malformed pagination markup means a single page; this is the
/// expected shape for short threads, not an error.
pub fn page_count(doc: &Html) -> Result<usize> {
    let paginate_sel = parse_selector("ul.paginate")?;
    let re = Regex::new(r"of (\d+)").expect("static pattern");

    for el in doc.select(&paginate_sel) {
        let text: String = el.text().collect();
        if let Some(caps) = re.captures(&text) {
            if let Ok(n) = caps[1].parse::<usize>() {
                return Ok(n.max(1));
            }
        }
    }
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_indicator_means_single_page() {
        let doc = Html::parse_document("<body><table><tr><td>only page</td></tr></table></body>");
        assert_eq!(page_count(&doc).unwrap(), 1);
    }

    #[test]
    fn test_parses_page_of_n() {
        let doc = Html::parse_document(
            r#"<ul class="paginate"><li>Page 2 of 5</li></ul><div>rows</div>"#,
        );
        assert_eq!(page_count(&doc).unwrap(), 5);
    }

    #[test]
    fn test_malformed_indicator_is_single_page() {
        let doc = Html::parse_document(r#"<ul class="paginate"><li>Jump to page</li></ul>"#);
        assert_eq!(page_count(&doc).unwrap(), 1);
    }

    #[test]
    fn test_zero_pages_clamped_to_one() {
        let doc = Html::parse_document(r#"<ul class="paginate">Page 0 of 0</ul>"#);
        assert_eq!(page_count(&doc).unwrap(), 1);
    }
}
