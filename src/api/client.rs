// src/api/client.rs
//! HTTP client for the Notion API.
//!
//! A thin wrapper around reqwest that handles authentication headers and
//! request plumbing; parsing lives in [`super::parser`]. Retry and backoff
//! are the transport's concern, not modeled here.

use super::pagination::fetch_all;
use super::{parser, NotionRepository};
use crate::config::NotionSection;
use crate::error::AppError;
use crate::model::{Block, Page, PropertyValue};
use crate::types::{ApiKey, DatabaseId, PageId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    /// Creates a client against a different API host (used by tests).
    pub fn with_base_url(api_key: &ApiKey, base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    async fn get(&self, endpoint: &str) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }

    async fn patch<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("PATCH {}", url);
        Ok(self.client.patch(url).json(body).send().await?)
    }

    /// Lists one level of children for a block or page ID (hyphenated form).
    async fn list_children(&self, parent: &str) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent);
        fetch_all(|page_size, cursor| {
            let endpoint = endpoint.clone();
            async move {
                let mut query = format!("{}?page_size={}", endpoint, page_size);
                if let Some(cursor) = cursor {
                    query.push_str(&format!("&start_cursor={}", cursor));
                }
                let response = self.get(&query).await?;
                let status = response.status();
                let body = response.text().await?;
                if !status.is_success() {
                    return Err(parser::error_from_response(status, &body));
                }
                parser::parse_blocks_page(&body)
            }
        })
        .await
    }

    /// Recursively resolves children for every block that declares them.
    fn resolve_children<'a>(
        &'a self,
        blocks: &'a mut Vec<Block>,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
        Box::pin(async move {
            for block in blocks.iter_mut() {
                if block.has_children() && block.children().is_empty() {
                    let mut children = self.list_children(&block.id().to_hyphenated()).await?;
                    self.resolve_children(&mut children).await?;
                    block.set_children(children);
                }
            }
            Ok(())
        })
    }
}

/// Database query filter: an OR of select-equals clauses over the configured
/// filter property. `None` when no property or values are configured.
fn build_filter(notion: &NotionSection) -> Option<serde_json::Value> {
    if notion.filter_prop.is_empty() || notion.filter_value.is_empty() {
        return None;
    }
    let mut clauses: Vec<serde_json::Value> = notion
        .filter_value
        .iter()
        .map(|value| {
            json!({
                "property": notion.filter_prop,
                "select": { "equals": value }
            })
        })
        .collect();
    Some(if clauses.len() == 1 {
        clauses.remove(0)
    } else {
        json!({ "or": clauses })
    })
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn query_pages(&self, notion: &NotionSection) -> Result<Vec<Page>, AppError> {
        let database = DatabaseId::parse(&notion.database_id)?;
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let filter = build_filter(notion);

        fetch_all(|page_size, cursor| {
            let endpoint = endpoint.clone();
            let filter = filter.clone();
            async move {
                let mut body = json!({ "page_size": page_size });
                if let Some(filter) = filter {
                    body["filter"] = filter;
                }
                if let Some(cursor) = cursor {
                    body["start_cursor"] = json!(cursor);
                }
                let response = self.post(&endpoint, &body).await?;
                let status = response.status();
                let text = response.text().await?;
                if !status.is_success() {
                    return Err(parser::error_from_response(status, &text));
                }
                parser::parse_pages_page(&text)
            }
        })
        .await
    }

    async fn block_tree(&self, page: &PageId) -> Result<Vec<Block>, AppError> {
        let mut blocks = self.list_children(&page.to_hyphenated()).await?;
        self.resolve_children(&mut blocks).await?;
        Ok(blocks)
    }

    async fn update_status(&self, page: &Page, notion: &NotionSection) -> Result<bool, AppError> {
        if notion.published_value.is_empty() || notion.filter_prop.is_empty() {
            return Ok(false);
        }

        // Only flip a select property that currently holds a different value.
        match page.properties.get(&notion.filter_prop) {
            Some(PropertyValue::Select {
                select: Some(option),
            }) if option.name != notion.published_value => {}
            _ => return Ok(false),
        }

        let mut properties = serde_json::Map::new();
        properties.insert(
            notion.filter_prop.clone(),
            json!({ "select": { "name": notion.published_value } }),
        );
        let body = json!({ "properties": properties });

        let endpoint = format!("pages/{}", page.id.to_hyphenated());
        let response = self.patch(&endpoint, &body).await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(parser::error_from_response(status, &text));
        }
        Ok(true)
    }
}
