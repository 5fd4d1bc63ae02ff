// src/lib.rs
//! notion2md library — syncs Notion database pages into Markdown files.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration** — `SyncConfig`, `CommandLineInput`
//! - **Domain model** — `Page`, `Block`, `PropertyValue`, rich text types
//! - **API client** — `NotionRepository`, `NotionHttpClient`, parsers
//! - **Rendering** — `render_blocks`, `RenderContext`, front matter
//! - **Assets** — `AssetPipeline`
//! - **Sync** — `run`, `RunOptions`, `SyncCache`

mod api;
mod assets;
mod config;
mod constants;
mod error;
mod formatting;
mod model;
mod output;
mod sync;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    parse_since, CommandLineInput, MarkdownSection, NotionSection, SyncConfig,
};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, BookmarkBlock, BulletedListItemBlock, CalloutBlock, CodeBlock, ColumnBlock,
    ColumnListBlock, DateValue, DividerBlock, EmbedBlock, ExternalFile, FileObject, Heading1Block,
    Heading2Block, Heading3Block, Icon, ImageBlock, LinkPreview, NotionFile,
    NumberedListItemBlock, Page, ParagraphBlock, PropertyValue, QuoteBlock, SelectOption,
    SyncedBlock, SyncedFrom, TableBlock, TableRowBlock, TemplateBlock, TextBlockContent,
    ToDoBlock, ToggleBlock, UnsupportedBlock, User,
};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, DatabaseId, EquationData, Link, PageId, RichTextItem,
    RichTextType, ShortcodeTarget, TextContent,
};

// --- API Client ---
pub use crate::api::{
    link_preview, parser, NotionHttpClient, NotionRepository, PaginatedResponse,
};

// --- Rendering ---
pub use crate::formatting::{
    front_matter, indent_code, render_blocks, rich_text_to_markdown, FrontMatterValue,
    RenderContext,
};

// --- Assets ---
pub use crate::assets::{local_filename, page_image_paths, path_escape, AssetPipeline};

// --- Sync ---
pub use crate::output::paths::{article_filename, page_display_name};
pub use crate::sync::cache::{cache_timestamp, CacheEntry, SyncCache};
pub use crate::sync::{run, RunOptions, SyncReport};
