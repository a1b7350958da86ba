//! Document model types for Leaflet block documents.
//!
//! This module defines the structured representation that markdown is
//! converted into before publishing, and that fetched documents are
//! converted out of. A [`Document`] holds ordered [`LinearDocument`] pages,
//! each page holds an ordered list of [`Block`]s.
//!
//! The model is also the wire format: every type serializes to the Leaflet
//! lexicon JSON shape, with `$type` tags only at that boundary.

mod blob;
mod block;
mod document;
mod page;

pub use blob::{Blob, BlobLink};
pub use block::{
    AspectRatio, Block, CodeBlock, HeaderBlock, ImageBlock, TextBlock, UnknownBlock, CODE_TYPE,
    HEADER_TYPE, IMAGE_TYPE, TEXT_TYPE,
};
pub use document::{Document, DOCUMENT_TYPE};
pub use page::{LinearDocument, BLOCK_ENTRY_TYPE, LINEAR_DOCUMENT_TYPE};
