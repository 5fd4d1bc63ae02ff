// src/formatting/mod.rs
//! Conversion of fetched Notion content into Markdown text.

pub mod block_renderer;
pub mod context;
pub mod front_matter;
pub mod rich_text;

pub use block_renderer::{indent_code, render_blocks};
pub use context::{FrontMatterValue, RenderContext};
pub use rich_text::rich_text_to_markdown;
