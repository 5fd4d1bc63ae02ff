// src/formatting/block_renderer.rs
//! Recursive block-to-Markdown rendering.
//!
//! Dispatch is a match over the closed [`Block`] enum; a variant without a
//! renderer is skipped without error, which is how unknown or future block
//! types degrade. After a block's own fragment, its children render at
//! `depth + 1`, depth-first pre-order.

use super::context::RenderContext;
use super::rich_text::rich_text_to_markdown;
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::error::AppError;
use crate::model::{
    Block, BookmarkBlock, CalloutBlock, CodeBlock, Icon, ImageBlock, TableBlock, TextBlockContent,
    ToDoBlock,
};
use crate::types::ShortcodeTarget;

/// Renders a sibling run of blocks at the given depth into the context's
/// buffer.
///
/// Maintains `same_block_idx`: incremented per rendered block and reset to
/// zero whenever the block type differs from the previous sibling. Skipped
/// blocks advance neither the counter nor the previous-type marker.
pub fn render_blocks(
    ctx: &mut RenderContext,
    blocks: &[Block],
    depth: usize,
) -> Result<(), AppError> {
    ctx.buffer.reserve(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);

    let mut same_block_idx = 0usize;
    let mut last_type: Option<&'static str> = None;

    for block in blocks {
        if skip_without_extended_syntax(ctx.shortcode, block) {
            continue;
        }
        same_block_idx += 1;
        if last_type != Some(block.block_type()) {
            same_block_idx = 0;
        }
        ctx.same_block_idx = same_block_idx;

        render_one(ctx, block, depth)?;
        last_type = Some(block.block_type());
    }

    Ok(())
}

/// Bookmarks and callouts only exist as shortcodes; without a target they
/// are omitted from the output entirely, children included.
fn skip_without_extended_syntax(target: ShortcodeTarget, block: &Block) -> bool {
    !target.is_enabled() && matches!(block, Block::Bookmark(_) | Block::Callout(_))
}

fn render_one(ctx: &mut RenderContext, block: &Block, depth: usize) -> Result<(), AppError> {
    // Tables assemble their row children themselves; generic child
    // recursion would render the rows twice.
    if let Block::Table(table) = block {
        let fragment = render_table(table, block.children());
        ctx.buffer.push_str(&fragment);
        return Ok(());
    }

    let fragment = match block {
        Block::Paragraph(b) => Some(paragraph(&b.content)),
        Block::Heading1(b) => Some(heading(1, &b.content)),
        Block::Heading2(b) => Some(heading(2, &b.content)),
        Block::Heading3(b) => Some(heading(3, &b.content)),
        Block::BulletedListItem(b) => Some(list_item(&b.content, depth)),
        Block::NumberedListItem(b) => Some(numbered_item(&b.content, depth, ctx.same_block_idx)),
        Block::ToDo(b) => Some(todo_item(b, depth)),
        Block::Toggle(b) => Some(list_item(&b.content, depth)),
        Block::Quote(b) => Some(quote(&b.content)),
        Block::Code(b) => Some(code_block(b, depth)),
        Block::Image(b) => Some(image(b)),
        Block::Divider(_) => Some("---\n\n".to_string()),
        Block::Callout(b) => Some(callout_shortcode(ctx.shortcode, b)),
        Block::Bookmark(b) => Some(bookmark_shortcode(ctx.shortcode, b)),
        // Structural containers contribute no markup of their own; their
        // children carry the content.
        Block::ColumnList(_) | Block::Column(_) | Block::Synced(_) | Block::Template(_) => {
            Some(String::new())
        }
        // No renderer registered: the block and its subtree are dropped.
        Block::Table(_) | Block::TableRow(_) | Block::Embed(_) | Block::Unsupported(_) => None,
    };

    let Some(fragment) = fragment else {
        return Ok(());
    };
    ctx.buffer.push_str(&fragment);

    if block.has_children() {
        render_blocks(ctx, block.children(), depth + 1)?;
    }
    Ok(())
}

fn text_of(content: &TextBlockContent) -> String {
    rich_text_to_markdown(&content.rich_text)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Prefixes every line of code content with `depth` levels of two-space
/// indent. Depth zero leaves the content untouched.
pub fn indent_code(content: &str, depth: usize) -> String {
    if depth == 0 {
        return content.to_string();
    }
    let prefix = indent(depth);
    content
        .split('\n')
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph(content: &TextBlockContent) -> String {
    format!("{}\n\n", text_of(content))
}

fn heading(level: usize, content: &TextBlockContent) -> String {
    format!("{} {}\n\n", "#".repeat(level), text_of(content))
}

fn list_item(content: &TextBlockContent, depth: usize) -> String {
    format!("{}- {}\n", indent(depth), text_of(content))
}

fn numbered_item(content: &TextBlockContent, depth: usize, same_block_idx: usize) -> String {
    format!(
        "{}{}. {}\n",
        indent(depth),
        same_block_idx + 1,
        text_of(content)
    )
}

fn todo_item(block: &ToDoBlock, depth: usize) -> String {
    format!(
        "{}- [{}] {}\n",
        indent(depth),
        if block.checked { 'x' } else { ' ' },
        text_of(&block.content)
    )
}

fn quote(content: &TextBlockContent) -> String {
    format!("> {}\n\n", text_of(content))
}

fn code_block(block: &CodeBlock, depth: usize) -> String {
    format!(
        "```{}\n{}\n```\n\n",
        block.language,
        indent_code(&text_of(&block.content), depth)
    )
}

fn image(block: &ImageBlock) -> String {
    format!(
        "![{}]({})\n\n",
        rich_text_to_markdown(&block.caption),
        block.image.url()
    )
}

fn callout_shortcode(target: ShortcodeTarget, block: &CalloutBlock) -> String {
    let text = text_of(&block.content);
    let emoji = block.icon.as_ref().and_then(Icon::emoji).unwrap_or("");
    match target {
        ShortcodeTarget::Hugo => format!(
            "{{{{< callout emoji=\"{}\" >}}}}\n{}\n{{{{< /callout >}}}}\n\n",
            emoji, text
        ),
        ShortcodeTarget::Hexo => {
            format!("{{% note info %}}\n{} {}\n{{% endnote %}}\n\n", emoji, text)
        }
        ShortcodeTarget::Vuepress => format!("::: tip\n{} {}\n:::\n\n", emoji, text),
        ShortcodeTarget::None => String::new(),
    }
}

fn bookmark_shortcode(target: ShortcodeTarget, block: &BookmarkBlock) -> String {
    let preview = block.preview.clone().unwrap_or_default();
    let title = if preview.title.is_empty() {
        let caption = rich_text_to_markdown(&block.caption);
        if caption.is_empty() {
            block.url.clone()
        } else {
            caption
        }
    } else {
        preview.title
    };

    match target {
        ShortcodeTarget::Hugo => format!(
            "{{{{< bookmark url=\"{}\" title=\"{}\" description=\"{}\" image=\"{}\" >}}}}\n\n",
            block.url,
            title,
            preview.description,
            preview.image.unwrap_or_default()
        ),
        ShortcodeTarget::Hexo => format!("{{% link \"{}\" \"{}\" %}}\n\n", title, block.url),
        ShortcodeTarget::Vuepress => {
            if preview.description.is_empty() {
                format!("[{}]({})\n\n", title, block.url)
            } else {
                format!("[{}]({})\n> {}\n\n", title, block.url, preview.description)
            }
        }
        ShortcodeTarget::None => String::new(),
    }
}

fn render_table(table: &TableBlock, rows: &[Block]) -> String {
    let mut cell_rows: Vec<Vec<String>> = rows
        .iter()
        .filter_map(|block| match block {
            Block::TableRow(row) => Some(
                row.cells
                    .iter()
                    .map(|cell| rich_text_to_markdown(cell).replace('|', "\\|"))
                    .collect(),
            ),
            _ => None,
        })
        .collect();

    if cell_rows.is_empty() {
        return String::new();
    }

    let width = cell_rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(table.table_width);
    for row in &mut cell_rows {
        row.resize(width, String::new());
    }

    let mut out = String::new();
    let mut rows_iter = cell_rows.into_iter();
    let header = if table.has_column_header {
        rows_iter.next().unwrap_or_default()
    } else {
        vec![String::new(); width]
    };
    out.push_str(&format!("| {} |\n", header.join(" | ")));
    out.push_str(&format!("|{}\n", " --- |".repeat(width)));
    for row in rows_iter {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BlockCommon, BookmarkBlock, BulletedListItemBlock, CalloutBlock, CodeBlock, DividerBlock,
        Heading2Block, LinkPreview, NumberedListItemBlock, ParagraphBlock, QuoteBlock, TableBlock,
        TableRowBlock, UnsupportedBlock,
    };
    use crate::types::{BlockId, RichTextItem};
    use pretty_assertions::assert_eq;

    fn id(n: u32) -> BlockId {
        BlockId::parse(&format!("{:032x}", n)).unwrap()
    }

    fn spans(text: &str) -> TextBlockContent {
        TextBlockContent::from_spans(vec![RichTextItem::text(text)])
    }

    fn numbered(n: u32, text: &str) -> Block {
        Block::NumberedListItem(NumberedListItemBlock {
            common: BlockCommon::new(id(n)),
            content: spans(text),
        })
    }

    fn paragraph_block(n: u32, text: &str) -> Block {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::new(id(n)),
            content: spans(text),
        })
    }

    fn render(blocks: &[Block], target: ShortcodeTarget) -> String {
        let mut ctx = RenderContext::new(target);
        render_blocks(&mut ctx, blocks, 0).unwrap();
        ctx.buffer
    }

    #[test]
    fn consecutive_numbered_items_count_up() {
        let blocks = vec![numbered(1, "a"), numbered(2, "b"), numbered(3, "c")];
        assert_eq!(render(&blocks, ShortcodeTarget::None), "1. a\n2. b\n3. c\n");
    }

    #[test]
    fn a_different_block_type_resets_the_run_counter() {
        let blocks = vec![
            numbered(1, "a"),
            numbered(2, "b"),
            paragraph_block(3, "break"),
            numbered(4, "c"),
            numbered(5, "d"),
        ];
        assert_eq!(
            render(&blocks, ShortcodeTarget::None),
            "1. a\n2. b\nbreak\n\n1. c\n2. d\n"
        );
    }

    #[test]
    fn children_render_depth_first_after_their_parent() {
        let child = Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::new(id(2)),
            content: spans("nested"),
        });
        let parent = Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::with_children(id(1), vec![child]),
            content: spans("top"),
        });
        let after = paragraph_block(3, "after");

        assert_eq!(
            render(&[parent, after], ShortcodeTarget::None),
            "- top\n  - nested\nafter\n\n"
        );
    }

    #[test]
    fn callouts_vanish_without_a_shortcode_target() {
        let callout = Block::Callout(CalloutBlock {
            common: BlockCommon::new(id(1)),
            content: spans("watch out"),
            icon: Some(Icon::Emoji {
                emoji: "💡".to_string(),
            }),
        });
        assert_eq!(render(&[callout.clone()], ShortcodeTarget::None), "");

        let hugo = render(&[callout], ShortcodeTarget::Hugo);
        assert!(!hugo.is_empty());
        assert_eq!(
            hugo,
            "{{< callout emoji=\"💡\" >}}\nwatch out\n{{< /callout >}}\n\n"
        );
    }

    #[test]
    fn skipped_callouts_do_not_disturb_the_run_counter() {
        let callout = Block::Callout(CalloutBlock {
            common: BlockCommon::new(id(9)),
            content: spans("aside"),
            icon: None,
        });
        let blocks = vec![numbered(1, "a"), callout, numbered(2, "b")];
        // The callout is omitted before counter bookkeeping, so the
        // numbered run continues uninterrupted.
        assert_eq!(render(&blocks, ShortcodeTarget::None), "1. a\n2. b\n");
    }

    #[test]
    fn bookmarks_render_resolved_preview_data() {
        let bookmark = Block::Bookmark(BookmarkBlock {
            common: BlockCommon::new(id(1)),
            url: "https://example.com/post".to_string(),
            caption: Vec::new(),
            preview: Some(LinkPreview {
                title: "A Post".to_string(),
                description: "About things".to_string(),
                image: Some("https://example.com/og.png".to_string()),
            }),
        });

        assert_eq!(render(&[bookmark.clone()], ShortcodeTarget::None), "");
        assert_eq!(
            render(&[bookmark.clone()], ShortcodeTarget::Vuepress),
            "[A Post](https://example.com/post)\n> About things\n\n"
        );
        let hugo = render(&[bookmark], ShortcodeTarget::Hugo);
        assert!(hugo.contains("url=\"https://example.com/post\""));
        assert!(hugo.contains("title=\"A Post\""));
        assert!(hugo.contains("image=\"https://example.com/og.png\""));
    }

    #[test]
    fn unknown_blocks_are_skipped_with_their_subtree() {
        let unknown = Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::with_children(id(1), vec![paragraph_block(2, "hidden")]),
            block_type: "ai_block".to_string(),
        });
        let blocks = vec![unknown, paragraph_block(3, "visible")];
        assert_eq!(render(&blocks, ShortcodeTarget::None), "visible\n\n");
    }

    #[test]
    fn code_content_is_indented_per_depth_level() {
        let code = Block::Code(CodeBlock {
            common: BlockCommon::new(id(2)),
            content: spans("fn main() {\n    run();\n}"),
            language: "rust".to_string(),
            caption: Vec::new(),
        });
        let parent = Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::with_children(id(1), vec![code]),
            content: spans("example"),
        });

        assert_eq!(
            render(&[parent], ShortcodeTarget::None),
            "- example\n```rust\n  fn main() {\n      run();\n  }\n```\n\n"
        );
    }

    #[test]
    fn indent_code_prefixes_every_line_including_blank_ones() {
        assert_eq!(indent_code("a\n\nb", 2), "    a\n    \n    b");
        assert_eq!(indent_code("as-is", 0), "as-is");
    }

    #[test]
    fn quotes_and_dividers_and_headings_render() {
        let blocks = vec![
            Block::Heading2(Heading2Block {
                common: BlockCommon::new(id(1)),
                content: spans("Section"),
            }),
            Block::Quote(QuoteBlock {
                common: BlockCommon::new(id(2)),
                content: spans("wise words"),
            }),
            Block::Divider(DividerBlock {
                common: BlockCommon::new(id(3)),
            }),
        ];
        assert_eq!(
            render(&blocks, ShortcodeTarget::None),
            "## Section\n\n> wise words\n\n---\n\n"
        );
    }

    #[test]
    fn tables_assemble_their_rows_with_a_header() {
        let row = |n: u32, a: &str, b: &str| {
            Block::TableRow(TableRowBlock {
                common: BlockCommon::new(id(n)),
                cells: vec![vec![RichTextItem::text(a)], vec![RichTextItem::text(b)]],
            })
        };
        let table = Block::Table(TableBlock {
            common: BlockCommon::with_children(
                id(1),
                vec![row(2, "Name", "Role"), row(3, "Ada", "Engineer")],
            ),
            table_width: 2,
            has_column_header: true,
            has_row_header: false,
        });

        assert_eq!(
            render(&[table], ShortcodeTarget::None),
            "| Name | Role |\n| --- | --- |\n| Ada | Engineer |\n\n"
        );
    }
}
