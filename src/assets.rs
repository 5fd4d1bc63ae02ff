// src/assets.rs
//! Asset localization: downloading remote images and resolving bookmark
//! previews ahead of rendering, rewriting references as it goes.
//!
//! Any failure here aborts the page's generation; partially localized trees
//! are never rendered.

use crate::api::link_preview::fetch_link_preview;
use crate::error::AppError;
use crate::model::{Block, FileObject};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use url::Url;

/// Downloads remote files into a per-page directory and rewrites their
/// references to site-relative visit paths.
pub struct AssetPipeline<'a> {
    http: &'a reqwest::Client,
    save_dir: PathBuf,
    visit_prefix: String,
}

impl<'a> AssetPipeline<'a> {
    pub fn new(http: &'a reqwest::Client, save_dir: PathBuf, visit_prefix: String) -> Self {
        Self {
            http,
            save_dir,
            visit_prefix,
        }
    }

    /// Walks the block tree, localizing image references and, when extended
    /// syntax is enabled, resolving bookmark previews. Subtrees of extended
    /// blocks are left untouched when the syntax is disabled, since they
    /// will not be rendered.
    pub async fn localize_tree(
        &self,
        blocks: &mut Vec<Block>,
        extended_syntax: bool,
    ) -> Result<(), AppError> {
        self.localize_level(blocks, extended_syntax).await
    }

    fn localize_level<'b>(
        &'b self,
        blocks: &'b mut Vec<Block>,
        extended_syntax: bool,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'b>> {
        Box::pin(async move {
            for block in blocks.iter_mut() {
                if !extended_syntax && matches!(block, Block::Bookmark(_) | Block::Callout(_)) {
                    continue;
                }
                match block {
                    Block::Image(image) => self.localize_file(&mut image.image).await?,
                    Block::Bookmark(bookmark) => {
                        bookmark.preview =
                            Some(fetch_link_preview(self.http, &bookmark.url).await?);
                    }
                    _ => {}
                }
                if !block.children().is_empty() {
                    self.localize_level(block.children_mut(), extended_syntax)
                        .await?;
                }
            }
            Ok(())
        })
    }

    /// Downloads one file and rewrites its URL to the local visit path.
    pub async fn localize_file(&self, file: &mut FileObject) -> Result<(), AppError> {
        let remote = file.url().to_string();
        let download_error = |message: String| AppError::AssetDownload {
            url: remote.clone(),
            message,
        };

        let response = self
            .http
            .get(&remote)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_error(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let filename = local_filename(&remote)?;
        tokio::fs::create_dir_all(&self.save_dir).await?;
        tokio::fs::write(self.save_dir.join(&filename), &bytes).await?;

        file.set_url(format!(
            "{}/{}",
            self.visit_prefix.trim_end_matches('/'),
            filename
        ));
        Ok(())
    }
}

/// Derives a collision-free local filename from the source URL.
///
/// Notion assigns generic names like `Untitled.png` to many uploads, so the
/// host and the full URL path are folded into the name; an `Untitled.*`
/// basename is replaced by its parent path segment plus extension.
pub fn local_filename(raw_url: &str) -> Result<String, AppError> {
    let parsed = Url::parse(raw_url).map_err(|e| AppError::AssetDownload {
        url: raw_url.to_string(),
        message: format!("malformed url: {}", e),
    })?;

    let segments: Vec<&str> = parsed.path().split('/').collect();
    let mut basename = segments.last().copied().unwrap_or_default().to_string();
    if basename.starts_with("Untitled.") && segments.len() >= 2 {
        let extension = Path::new(parsed.path())
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        basename = format!("{}{}", segments[segments.len() - 2], extension);
    }

    Ok(format!(
        "{}_{}_{}",
        parsed.host_str().unwrap_or_default(),
        segments.join("_"),
        basename
    ))
}

/// Computes the image save directory and visit prefix for a page.
pub fn page_image_paths(
    image_save_path: &str,
    image_public_link: &str,
    page_name: &str,
) -> (PathBuf, String) {
    (
        Path::new(image_save_path).join(page_name),
        format!(
            "{}/{}",
            image_public_link.trim_end_matches('/'),
            path_escape(page_name)
        ),
    )
}

/// Percent-escapes one path segment so it is safe inside a URL path.
/// Unreserved characters and the segment-safe subset of sub-delims pass
/// through; everything else (spaces, slashes, punctuation) is encoded.
pub fn path_escape(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'~'
            | b'$'
            | b'&'
            | b'+'
            | b'='
            | b':'
            | b'@' => escaped.push(byte as char),
            other => escaped.push_str(&format!("%{:02X}", other)),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filenames_fold_in_host_and_path() {
        let name = local_filename("https://images.example.com/a/b/photo.png?sig=abc").unwrap();
        assert_eq!(name, "images.example.com__a_b_photo.png_photo.png");
    }

    #[test]
    fn untitled_uploads_take_their_parent_segment_name() {
        let name =
            local_filename("https://files.example.com/block-1234/Untitled.png").unwrap();
        assert!(name.ends_with("_block-1234.png"));
        assert!(!name.ends_with("Untitled.png"));
    }

    #[test]
    fn same_basename_under_different_paths_stays_distinct() {
        let first = local_filename("https://h.example.com/one/img.png").unwrap();
        let second = local_filename("https://h.example.com/two/img.png").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_urls_are_rejected() {
        assert!(local_filename("not a url").is_err());
    }

    #[test]
    fn page_names_are_escaped_in_visit_paths() {
        let (save, visit) = page_image_paths("static/images", "/images/", "My Page");
        assert_eq!(save, Path::new("static/images/My Page"));
        assert_eq!(visit, "/images/My%20Page");
    }

    #[test]
    fn path_escape_keeps_pchar_characters() {
        assert_eq!(path_escape("hello-world!"), "hello-world%21");
        assert_eq!(path_escape("a b/c"), "a%20b%2Fc");
        assert_eq!(path_escape("plain_name.md"), "plain_name.md");
    }
}
