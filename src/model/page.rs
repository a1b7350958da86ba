//! Page-level types.

use super::Block;
use serde::{Deserialize, Serialize};

/// Lexicon type of a linear page.
pub const LINEAR_DOCUMENT_TYPE: &str = "pub.leaflet.pages.linearDocument";
/// Lexicon type of the per-block wrapper inside a linear page.
pub const BLOCK_ENTRY_TYPE: &str = "pub.leaflet.pages.linearDocument#block";

/// A single page: blocks laid out top to bottom.
///
/// Block order is significant and is never changed by conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type", rename = "pub.leaflet.pages.linearDocument")]
pub struct LinearDocument {
    /// Content blocks on the page
    #[serde(default, with = "block_entries")]
    pub blocks: Vec<Block>,
}

impl LinearDocument {
    /// Create a new empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a page holding the given blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the page is empty (no content blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl From<Vec<Block>> for LinearDocument {
    fn from(blocks: Vec<Block>) -> Self {
        Self::from_blocks(blocks)
    }
}

/// Each block on the wire sits inside a `linearDocument#block` wrapper.
mod block_entries {
    use super::Block;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    #[serde(tag = "$type", rename = "pub.leaflet.pages.linearDocument#block")]
    struct EntryRef<'a> {
        block: &'a Block,
    }

    #[derive(Deserialize)]
    struct Entry {
        block: Block,
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(blocks: &Vec<Block>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(blocks.iter().map(|block| EntryRef { block }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Block>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|entry| entry.block).collect())
    }
}
