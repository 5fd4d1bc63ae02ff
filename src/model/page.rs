// src/model/page.rs
//! Pages and their typed property map.

use super::blocks::FileObject;
use crate::types::{PageId, RichTextItem};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One database row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
    #[serde(default)]
    pub cover: Option<FileObject>,
}

impl Page {
    /// The rich text spans of the page's title property.
    ///
    /// Prefers a title property named `title` or `name` (case-insensitive),
    /// falling back to any title property with content. Returns `None` for
    /// pages without a title property at all.
    pub fn title_rich_text(&self) -> Option<&[RichTextItem]> {
        for (key, property) in &self.properties {
            if let PropertyValue::Title { title } = property {
                if key.eq_ignore_ascii_case("title") || key.eq_ignore_ascii_case("name") {
                    return Some(title);
                }
            }
        }
        for property in self.properties.values() {
            if let PropertyValue::Title { title } = property {
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }
        None
    }
}

/// A typed page property value.
///
/// The serde attributes mirror the API's `{"type": ..., "<type>": ...}`
/// shape. Property types outside this vocabulary become `Unsupported` and
/// are silently omitted from front matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichTextItem> },
    RichText { rich_text: Vec<RichTextItem> },
    Select { select: Option<SelectOption> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Date { date: Option<DateValue> },
    People { people: Vec<User> },
    Number { number: Option<f64> },
    Url { url: Option<String> },
    Email { email: Option<String> },
    PhoneNumber { phone_number: Option<String> },
    Unsupported,
}

/// One option of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// A date property value. Start and end are kept as the API's raw strings
/// (date-only or RFC 3339) and parsed leniently at formatting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// A workspace member referenced by a people property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
}
