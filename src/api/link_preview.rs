// src/api/link_preview.rs
//! OpenGraph metadata scraping for bookmark blocks.

use crate::error::AppError;
use crate::model::LinkPreview;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static OG_PROPERTY_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<meta\b[^>]*\bproperty\s*=\s*["']og:(title|description|image)["'][^>]*\bcontent\s*=\s*["']([^"']*)["']"#,
    )
    .unwrap()
});

static OG_CONTENT_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<meta\b[^>]*\bcontent\s*=\s*["']([^"']*)["'][^>]*\bproperty\s*=\s*["']og:(title|description|image)["']"#,
    )
    .unwrap()
});

static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Fetches a page and extracts its OpenGraph metadata.
pub async fn fetch_link_preview(
    client: &reqwest::Client,
    url: &str,
) -> Result<LinkPreview, AppError> {
    let preview_error = |message: String| AppError::LinkPreview {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| preview_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(preview_error(format!(
            "unexpected status {}",
            response.status()
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| preview_error(e.to_string()))?;

    let mut preview = parse_open_graph(&html);
    // Relative og:image URLs are resolved against the bookmark target.
    if let Some(image) = preview.image.take() {
        preview.image = Some(absolutize(url, &image));
    }
    Ok(preview)
}

/// Extracts og:title, og:description, and og:image from an HTML document,
/// falling back to the `<title>` tag when no og:title is present.
pub fn parse_open_graph(html: &str) -> LinkPreview {
    let mut preview = LinkPreview::default();

    let mut apply = |key: &str, value: &str| match key {
        "title" if preview.title.is_empty() => preview.title = value.to_string(),
        "description" if preview.description.is_empty() => {
            preview.description = value.to_string()
        }
        "image" if preview.image.is_none() => preview.image = Some(value.to_string()),
        _ => {}
    };

    for capture in OG_PROPERTY_FIRST.captures_iter(html) {
        apply(&capture[1].to_ascii_lowercase(), &capture[2]);
    }
    for capture in OG_CONTENT_FIRST.captures_iter(html) {
        apply(&capture[2].to_ascii_lowercase(), &capture[1]);
    }

    if preview.title.is_empty() {
        if let Some(capture) = TITLE_TAG.captures(html) {
            preview.title = capture[1].trim().to_string();
        }
    }

    preview
}

fn absolutize(base: &str, candidate: &str) -> String {
    if Url::parse(candidate).is_ok() {
        return candidate.to_string();
    }
    Url::parse(base)
        .and_then(|b| b.join(candidate))
        .map(|joined| joined.to_string())
        .unwrap_or_else(|_| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_open_graph_tags() {
        let html = r#"<html><head>
            <meta property="og:title" content="A Post" />
            <meta property="og:description" content="About things" />
            <meta property="og:image" content="https://example.com/a.png" />
        </head><body></body></html>"#;
        let preview = parse_open_graph(html);
        assert_eq!(preview.title, "A Post");
        assert_eq!(preview.description, "About things");
        assert_eq!(preview.image.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn handles_reversed_attribute_order() {
        let html = r#"<meta content="Reversed" property="og:title">"#;
        assert_eq!(parse_open_graph(html).title, "Reversed");
    }

    #[test]
    fn falls_back_to_the_title_tag() {
        let html = "<html><head><title> Plain Title </title></head></html>";
        let preview = parse_open_graph(html);
        assert_eq!(preview.title, "Plain Title");
        assert!(preview.image.is_none());
    }

    #[test]
    fn relative_images_resolve_against_the_page() {
        assert_eq!(
            absolutize("https://example.com/post/1", "/img/cover.png"),
            "https://example.com/img/cover.png"
        );
        assert_eq!(
            absolutize("https://example.com/", "https://cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }
}
