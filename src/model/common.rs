use super::block::Block;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Data shared by every block variant.
///
/// Children are owned by the parent block. The `has_children` flag comes from
/// the API; the orchestrator resolves the actual child list before handing
/// the tree to the renderer, so a block with `has_children` set always has a
/// populated `children` vector by render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BlockCommon {
    pub id: BlockId,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl BlockCommon {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            has_children: false,
            children: Vec::new(),
        }
    }

    pub fn with_children(id: BlockId, children: Vec<Block>) -> Self {
        Self {
            id,
            has_children: !children.is_empty(),
            children,
        }
    }
}
