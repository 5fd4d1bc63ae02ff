// src/api/mod.rs
//! Notion API interaction — the ability to retrieve and update content.
//!
//! Business logic depends on the [`NotionRepository`] trait, never on HTTP
//! details. The trait assumes its implementation handles transport policy
//! (the orchestrator never retries).

pub mod client;
pub mod link_preview;
mod pagination;
pub mod parser;

use crate::config::NotionSection;
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::PageId;

/// The ability to read pages and block trees from a Notion database and to
/// flip a page's status property.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Query the configured database, applying its status filter.
    async fn query_pages(&self, notion: &NotionSection) -> Result<Vec<Page>, AppError>;

    /// Fetch a page's full block tree with every child level resolved.
    /// The renderer never fetches lazily.
    async fn block_tree(&self, page: &PageId) -> Result<Vec<Block>, AppError>;

    /// Flip the page's status property to the configured published value.
    /// Returns whether anything changed.
    async fn update_status(&self, page: &Page, notion: &NotionSection) -> Result<bool, AppError>;
}

pub use client::NotionHttpClient;
pub use pagination::{fetch_all, PaginatedResponse};
