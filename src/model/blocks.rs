use super::common::BlockCommon;
use crate::types::{BlockId, RichTextItem};
use serde::{Deserialize, Serialize};

/// Text content shared by paragraph-like blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlockContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
}

impl TextBlockContent {
    pub fn from_spans(rich_text: Vec<RichTextItem>) -> Self {
        Self { rich_text }
    }
}

/// Paragraph block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParagraphBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading 1 block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Heading1Block {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading 2 block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Heading2Block {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading 3 block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Heading3Block {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Bulleted list item block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BulletedListItemBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Numbered list item block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NumberedListItemBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    #[serde(default)]
    pub checked: bool,
}

/// Toggle block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToggleBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Quote block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuoteBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Callout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    #[serde(default)]
    pub icon: Option<Icon>,
}

/// Icon attached to a callout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalFile },
    File { file: NotionFile },
}

impl Icon {
    /// The emoji character, when the icon is one.
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Self::Emoji { emoji } => Some(emoji),
            _ => None,
        }
    }
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

/// Bookmark block.
///
/// `preview` is not part of the API payload; it is populated from the
/// bookmark's target page ahead of rendering when extended syntax is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BookmarkBlock {
    pub common: BlockCommon,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<LinkPreview>,
}

/// Link metadata scraped from a bookmark target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LinkPreview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Image block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub common: BlockCommon,
    pub image: FileObject,
    #[serde(default)]
    pub caption: Vec<RichTextItem>,
}

/// Embed block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EmbedBlock {
    pub common: BlockCommon,
    #[serde(default)]
    pub url: String,
}

/// Divider block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// Table block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableBlock {
    pub common: BlockCommon,
    #[serde(default)]
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    #[serde(default)]
    pub cells: Vec<Vec<RichTextItem>>,
}

/// Column list block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnListBlock {
    pub common: BlockCommon,
}

/// Column block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnBlock {
    pub common: BlockCommon,
}

/// Synced block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SyncedBlock {
    pub common: BlockCommon,
    #[serde(default)]
    pub synced_from: Option<SyncedFrom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedFrom {
    pub block_id: BlockId,
}

/// Template block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemplateBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Unsupported block — keeps the raw type name for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    #[serde(default)]
    pub block_type: String,
}

/// A file reference, either hosted by Notion or external.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileObject {
    External { external: ExternalFile },
    File { file: NotionFile },
}

impl FileObject {
    pub fn external(url: impl Into<String>) -> Self {
        Self::External {
            external: ExternalFile { url: url.into() },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::File { file } => &file.url,
        }
    }

    pub fn set_url(&mut self, url: String) {
        match self {
            Self::External { external } => external.url = url,
            Self::File { file } => file.url = url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionFile {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<chrono::DateTime<chrono::Utc>>,
}
