// src/types/rich_text.rs
//! Rich text spans as Notion models them on the wire.
//!
//! A span is a tagged variant (text, equation, mention) plus a shared set of
//! annotation flags. The serde attributes mirror the API's JSON shape so
//! response payloads deserialize directly into these types.

use serde::{Deserialize, Serialize};

/// Styling flags attached to a rich text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: "default".to_string(),
        }
    }
}

/// Hyperlink attached to a text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Payload of a plain-text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default)]
    pub link: Option<Link>,
}

/// Payload of an inline equation span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationData {
    pub expression: String,
}

/// The tagged variant of a rich text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextType {
    Text { text: TextContent },
    Equation { equation: EquationData },
    Mention { mention: serde_json::Value },
}

/// One rich text span: variant payload plus annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(flatten)]
    pub variant: RichTextType,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl RichTextItem {
    /// An unstyled text span.
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            variant: RichTextType::Text {
                text: TextContent {
                    content: content.clone(),
                    link: None,
                },
            },
            annotations: Annotations::default(),
            plain_text: content,
            href: None,
        }
    }

    /// A text span with explicit annotations.
    pub fn styled(content: impl Into<String>, annotations: Annotations) -> Self {
        let mut item = Self::text(content);
        item.annotations = annotations;
        item
    }

    /// A text span carrying a hyperlink.
    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        let content = content.into();
        let url = url.into();
        Self {
            variant: RichTextType::Text {
                text: TextContent {
                    content: content.clone(),
                    link: Some(Link { url: url.clone() }),
                },
            },
            annotations: Annotations::default(),
            plain_text: content,
            href: Some(url),
        }
    }

    /// An inline equation span.
    pub fn equation(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        Self {
            variant: RichTextType::Equation {
                equation: EquationData {
                    expression: expression.clone(),
                },
            },
            annotations: Annotations::default(),
            plain_text: expression,
            href: None,
        }
    }
}
