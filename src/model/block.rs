use super::blocks::*;
use super::common::BlockCommon;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Bookmark($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Embed($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::ColumnList($pattern) => $result,
            Block::Column($pattern) => $result,
            Block::Synced($pattern) => $result,
            Block::Template($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// Block represents all supported Notion block types.
///
/// Every variant carries a [`BlockCommon`], giving a uniform accessor for
/// the child sequence regardless of variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Heading1(Heading1Block),
    Heading2(Heading2Block),
    Heading3(Heading3Block),
    BulletedListItem(BulletedListItemBlock),
    NumberedListItem(NumberedListItemBlock),
    ToDo(ToDoBlock),
    Toggle(ToggleBlock),
    Quote(QuoteBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Bookmark(BookmarkBlock),
    Image(ImageBlock),
    Embed(EmbedBlock),
    Divider(DividerBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    ColumnList(ColumnListBlock),
    Column(ColumnBlock),
    Synced(SyncedBlock),
    Template(TemplateBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    /// Get the block's ID
    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    /// Get the block's children
    pub fn children(&self) -> &[Block] {
        match_all_blocks!(self, b => &b.common.children)
    }

    /// Get mutable reference to children
    pub fn children_mut(&mut self) -> &mut Vec<Block> {
        match_all_blocks!(self, b => &mut b.common.children)
    }

    /// Check if the block declares children
    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    /// Get mutable common block data
    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    /// Set the resolved children
    pub fn set_children(&mut self, children: Vec<Block>) {
        self.common_mut().children = children;
    }

    /// Get the block type name as the API spells it
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Toggle(_) => "toggle",
            Block::Quote(_) => "quote",
            Block::Callout(_) => "callout",
            Block::Code(_) => "code",
            Block::Bookmark(_) => "bookmark",
            Block::Image(_) => "image",
            Block::Embed(_) => "embed",
            Block::Divider(_) => "divider",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
            Block::ColumnList(_) => "column_list",
            Block::Column(_) => "column",
            Block::Synced(_) => "synced_block",
            Block::Template(_) => "template",
            Block::Unsupported(_) => "unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RichTextItem;

    fn block_id(n: u8) -> BlockId {
        BlockId::parse(&format!("{:032x}", n)).unwrap()
    }

    #[test]
    fn children_accessor_is_uniform_across_variants() {
        let child = Block::Paragraph(ParagraphBlock {
            common: BlockCommon::new(block_id(2)),
            content: TextBlockContent::from_spans(vec![RichTextItem::text("child")]),
        });
        let parent = Block::Quote(QuoteBlock {
            common: BlockCommon::with_children(block_id(1), vec![child.clone()]),
            content: TextBlockContent::default(),
        });

        assert!(parent.has_children());
        assert_eq!(parent.children(), &[child]);
        assert_eq!(parent.block_type(), "quote");
    }

    #[test]
    fn set_children_replaces_the_child_list() {
        let mut block = Block::Toggle(ToggleBlock {
            common: BlockCommon {
                id: block_id(1),
                has_children: true,
                children: Vec::new(),
            },
            content: TextBlockContent::default(),
        });
        assert!(block.children().is_empty());

        block.set_children(vec![Block::Divider(DividerBlock {
            common: BlockCommon::new(block_id(3)),
        })]);
        assert_eq!(block.children().len(), 1);
    }
}
