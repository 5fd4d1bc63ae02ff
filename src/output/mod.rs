// src/output/mod.rs
//! Output path derivation for generated articles.

pub mod paths;

pub use paths::{article_filename, page_display_name};
