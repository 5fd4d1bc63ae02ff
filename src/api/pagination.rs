// src/api/pagination.rs
//! Cursor pagination over Notion list endpoints.

use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// One page of a paginated list response.
#[derive(Debug)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Fetches every page of a cursor-paginated listing.
///
/// The closure receives the page size and the cursor to resume from
/// (`None` for the first request).
pub async fn fetch_all<T, F, Fut>(mut fetch_fn: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;

    loop {
        let response = fetch_fn(NOTION_API_PAGE_SIZE, cursor).await?;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);

        if !has_more || cursor.is_none() {
            break;
        }
    }

    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let items = fetch_all(|_, cursor| async move {
            Ok(match cursor.as_deref() {
                None => PaginatedResponse {
                    results: vec![1, 2],
                    has_more: true,
                    next_cursor: Some("c1".to_string()),
                },
                Some("c1") => PaginatedResponse {
                    results: vec![3],
                    has_more: false,
                    next_cursor: None,
                },
                other => panic!("unexpected cursor: {:?}", other),
            })
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stops_when_has_more_is_false_even_with_a_cursor() {
        let items = fetch_all(|_, _| async move {
            Ok(PaginatedResponse {
                results: vec!["only"],
                has_more: false,
                next_cursor: Some("dangling".to_string()),
            })
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["only"]);
    }
}
