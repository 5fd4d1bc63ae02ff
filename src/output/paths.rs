// src/output/paths.rs
//! Pure functions for output path and display name derivation.

use crate::types::PageId;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Derives the article's output path relative to the post directory.
///
/// The slug is the lower-cased title with spaces replaced by hyphens; other
/// characters pass through untouched. With month grouping the file lands in
/// a `YYYY-MM-DD` directory named for the page's creation date.
pub fn article_filename(title: &str, created: &DateTime<Utc>, group_by_month: bool) -> PathBuf {
    let slug = format!("{}.md", title.to_lowercase().replace(' ', "-"));
    if group_by_month {
        PathBuf::from(created.format("%Y-%m-%d").to_string()).join(slug)
    } else {
        PathBuf::from(slug)
    }
}

/// `N:title` display label for progress lines, falling back to the page ID
/// for untitled pages.
pub fn page_display_name(index: usize, title: Option<&str>, id: &PageId) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("{}:{}", index + 1, title),
        _ => format!("{}:{}", index + 1, id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn slug_lower_cases_and_hyphenates() {
        assert_eq!(
            article_filename("Hello World!", &created(), false),
            Path::new("hello-world!.md")
        );
    }

    #[test]
    fn month_grouping_adds_a_date_directory() {
        assert_eq!(
            article_filename("Hello World!", &created(), true),
            Path::new("2024-03-05/hello-world!.md")
        );
    }

    #[test]
    fn display_name_prefers_the_title() {
        let id = PageId::parse(&format!("{:032x}", 5u8)).unwrap();
        assert_eq!(page_display_name(0, Some("My Post"), &id), "1:My Post");
        assert_eq!(page_display_name(2, None, &id), format!("3:{}", id.as_str()));
        assert_eq!(page_display_name(0, Some(""), &id), format!("1:{}", id.as_str()));
    }
}
