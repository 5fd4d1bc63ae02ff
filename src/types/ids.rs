use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for Notion object IDs with phantom markers.
///
/// IDs are stored in the compact 32-hex-digit form; [`Id::to_hyphenated`]
/// produces the dashed UUID form the API expects in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

pub type PageId = Id<PageMarker>;
pub type BlockId = Id<BlockMarker>;
pub type DatabaseId = Id<DatabaseMarker>;

impl<T> Id<T> {
    /// Parse a Notion ID, accepting both the dashed UUID and compact forms.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        if normalized.len() != 32 || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidId(input.to_string()));
        }

        Ok(Self {
            value: normalized,
            _phantom: PhantomData,
        })
    }

    /// Get the ID in its compact 32-character form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Get the ID in dashed UUID form for API calls.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.value[0..8],
            &self.value[8..12],
            &self.value[12..16],
            &self.value[16..20],
            &self.value[20..32]
        )
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self {
            value: String::new(),
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Self::default());
        }
        Id::parse(&raw).map_err(serde::de::Error::custom)
    }
}
