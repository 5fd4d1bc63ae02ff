// src/formatting/rich_text.rs
//! Rendering of rich text spans into Markdown inline syntax.
//!
//! Annotation precedence: `code` wins over every emphasis combination; the
//! underline wrapper takes priority over strikethrough when both are set.

use crate::types::{Annotations, RichTextItem, RichTextType};

/// Renders an ordered sequence of spans into one Markdown string.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items.iter().map(render_span).collect()
}

/// Renders a single span.
pub fn render_span(item: &RichTextItem) -> String {
    match &item.variant {
        RichTextType::Text { text } => {
            let body = match &text.link {
                Some(link) => format!("[{}]({})", text.content, link.url),
                None => text.content.clone(),
            };
            apply_annotations(&body, &item.annotations)
        }
        // Equations and mentions produce no inline output.
        RichTextType::Equation { .. } | RichTextType::Mention { .. } => String::new(),
    }
}

fn apply_annotations(text: &str, annotations: &Annotations) -> String {
    if annotations.code {
        return format!("`{}`", text);
    }

    let emphasized = match (annotations.bold, annotations.italic) {
        (true, true) => format!("***{}***", text),
        (true, false) => format!("**{}**", text),
        (false, true) => format!("*{}*", text),
        (false, false) => text.to_string(),
    };

    // Color has no plain-Markdown form and is ignored.
    if annotations.underline {
        format!("__{}__", emphasized)
    } else if annotations.strikethrough {
        format!("~~{}~~", emphasized)
    } else {
        emphasized
    }
}
