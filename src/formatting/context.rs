// src/formatting/context.rs
//! Per-page mutable rendering state.

use crate::types::ShortcodeTarget;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// A front matter value. Serialized untagged so the YAML carries plain
/// scalars and lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FrontMatterValue {
    String(String),
    Number(f64),
    List(Vec<String>),
}

/// State threaded through one page's conversion, created fresh per page and
/// discarded after its file is written.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Front matter accumulator, in insertion order.
    pub front_matter: IndexMap<String, FrontMatterValue>,
    /// Rendered Markdown body.
    pub buffer: String,
    /// Directory image downloads are written to.
    pub image_save_path: PathBuf,
    /// Site-relative prefix rewritten image references point at.
    pub image_visit_path: String,
    /// Shortcode dialect for extended-syntax blocks.
    pub shortcode: ShortcodeTarget,
    /// Index within the current run of consecutive same-type siblings,
    /// maintained by the renderer loop.
    pub same_block_idx: usize,
}

impl RenderContext {
    pub fn new(shortcode: ShortcodeTarget) -> Self {
        Self {
            shortcode,
            ..Default::default()
        }
    }

    pub fn with_image_paths(mut self, save_path: PathBuf, visit_path: String) -> Self {
        self.image_save_path = save_path;
        self.image_visit_path = visit_path;
        self
    }
}
