//! # leafmark
//!
//! Conversion between note markdown and Leaflet block documents.
//!
//! Publishing a note turns its markdown into an ordered list of typed
//! blocks (headers, paragraphs, code, images); pulling a document turns the
//! blocks back into markdown for local storage.
//!
//! ## Quick Start
//!
//! ```
//! use leafmark::{from_leaflet, to_leaflet, Block};
//!
//! fn main() -> leafmark::Result<()> {
//!     let blocks = to_leaflet("# Title\n\nBody")?;
//!     assert_eq!(blocks, vec![Block::header(1, "Title"), Block::text("Body")]);
//!
//!     let markdown = from_leaflet(&blocks)?;
//!     assert_eq!(markdown, "# Title\n\nBody");
//!     Ok(())
//! }
//! ```
//!
//! ## Supported markdown
//!
//! - ATX headers (`#` to `######`)
//! - Fenced code blocks with an optional language
//! - Stand-alone images, uploaded through an [`ImageResolver`] when one is
//!   configured and kept as literal text otherwise
//! - Paragraphs, separated by blank lines
//!
//! Inline emphasis, lists and tables are carried as plain paragraph text.

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolver;

// Re-export commonly used types
pub use convert::MarkdownConverter;
pub use error::{Error, ErrorKind, Result};
pub use model::{
    AspectRatio, Blob, BlobLink, Block, CodeBlock, Document, HeaderBlock, ImageBlock,
    LinearDocument, TextBlock, UnknownBlock,
};
pub use parser::{ErrorMode, ParseOptions};
pub use render::{JsonFormat, RenderOptions};
pub use resolver::{BlobUploader, ImageResolver, UploadError};

/// Convert markdown to blocks with a default converter.
///
/// Image references are kept as literal text; use
/// [`MarkdownConverter::with_image_resolver`] to upload them.
///
/// # Example
///
/// ```
/// let blocks = leafmark::to_leaflet("```rust\nfn main() {}\n```").unwrap();
/// assert_eq!(blocks, vec![leafmark::Block::code(Some("rust"), "fn main() {}")]);
/// ```
pub fn to_leaflet(markdown: &str) -> Result<Vec<Block>> {
    MarkdownConverter::new().to_leaflet(markdown)
}

/// Convert blocks to markdown with a default converter.
pub fn from_leaflet(blocks: &[Block]) -> Result<String> {
    MarkdownConverter::new().from_leaflet(blocks)
}

/// Convert a whole document to markdown, flattening its pages.
pub fn document_to_markdown(doc: &Document) -> Result<String> {
    MarkdownConverter::new().document_to_markdown(doc)
}

/// Decode a fetched Leaflet document from JSON.
pub fn from_json(json: &str) -> Result<Document> {
    parser::from_json(json)
}

/// Encode a document as a Leaflet lexicon JSON record.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    render::to_json(doc, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_leaflet_empty() {
        assert_eq!(from_leaflet(&[]).unwrap(), "");
    }

    #[test]
    fn test_plain_paragraph_round_trip() {
        let input = "Just one paragraph with *stars* and `ticks` kept as-is.";
        let blocks = to_leaflet(input).unwrap();
        assert_eq!(blocks, vec![Block::text(input)]);
        assert_eq!(from_leaflet(&blocks).unwrap(), input);
    }

    #[test]
    fn test_unterminated_fence_errors() {
        let result = to_leaflet("```\nnever closed");
        assert!(matches!(result, Err(Error::UnterminatedCodeFence { line: 1 })));
    }

    #[test]
    fn test_document_to_markdown() {
        let doc = Document::new("did:plc:abc", "Pages")
            .with_page(LinearDocument::from_blocks(vec![Block::text("Page one")]))
            .with_page(LinearDocument::from_blocks(vec![Block::text("Page two")]));
        assert_eq!(document_to_markdown(&doc).unwrap(), "Page one\n\nPage two");
    }

    #[test]
    fn test_json_round_trip() {
        let doc = Document::new("did:plc:abc", "Wire")
            .with_page(LinearDocument::from_blocks(vec![Block::header(2, "Hi")]));
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), doc);
    }
}
