use thiserror::Error;

mod api_key;
mod ids;
mod rich_text;

pub use api_key::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Unknown shortcode syntax: {0} (expected hugo, hexo, or vuepress)")]
    InvalidShortcodeTarget(String),
}

/// The shortcode dialect used to render extended-syntax blocks.
///
/// Bookmarks and callouts have no portable Markdown form; each static-site
/// generator expresses them differently. When no target is selected those
/// blocks are omitted from the output entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortcodeTarget {
    #[default]
    None,
    Hugo,
    Hexo,
    Vuepress,
}

impl ShortcodeTarget {
    /// Parse a configured syntax name. An empty string selects no target.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "hugo" => Ok(Self::Hugo),
            "hexo" => Ok(Self::Hexo),
            "vuepress" => Ok(Self::Vuepress),
            other => Err(ValidationError::InvalidShortcodeTarget(other.to_string())),
        }
    }

    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}
