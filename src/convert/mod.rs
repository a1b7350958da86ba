//! Markdown ⇄ block document conversion facade.
//!
//! [`MarkdownConverter`] ties the parser, the renderer and an optional
//! [`ImageResolver`] together behind two operations: [`to_leaflet`] before a
//! note is published and [`from_leaflet`] after a document is fetched.
//!
//! [`to_leaflet`]: MarkdownConverter::to_leaflet
//! [`from_leaflet`]: MarkdownConverter::from_leaflet
//!
//! # Example
//!
//! ```no_run
//! use leafmark::convert::MarkdownConverter;
//! use leafmark::model::Blob;
//! use leafmark::resolver::UploadError;
//!
//! fn main() -> leafmark::Result<()> {
//!     let converter = MarkdownConverter::new().with_image_resolver(
//!         |data: &[u8], mime_type: &str| -> Result<Blob, UploadError> {
//!             // hand the bytes to the publishing client here
//!             Ok(Blob::new("bafkrei-example", mime_type, data.len() as u64))
//!         },
//!         "/home/me/notes",
//!     );
//!
//!     let blocks = converter.to_leaflet("# Trip\n\n![beach](photos/beach.jpg)")?;
//!     let markdown = converter.from_leaflet(&blocks)?;
//!     println!("{}", markdown);
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Block, Document, LinearDocument};
use crate::parser::{MarkdownParser, ParseOptions};
use crate::render::{MarkdownRenderer, RenderOptions};
use crate::resolver::{BlobUploader, ImageResolver};

/// Converts note markdown to Leaflet blocks and back.
///
/// A converter holds only immutable configuration, so one instance can be
/// shared between threads. Configuring image resolution produces a new
/// converter rather than changing an existing one.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    resolver: Option<ImageResolver>,
}

impl MarkdownConverter {
    /// Create a converter without image resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Return a copy of this converter that uploads local images through
    /// `uploader`, resolving relative paths against `note_dir`.
    ///
    /// `self` is left unchanged.
    pub fn with_image_resolver(
        &self,
        uploader: impl BlobUploader + 'static,
        note_dir: impl Into<PathBuf>,
    ) -> Self {
        self.with_resolver(ImageResolver::new(uploader, note_dir))
    }

    /// Return a copy of this converter using an already built resolver.
    pub fn with_resolver(&self, resolver: ImageResolver) -> Self {
        Self {
            parse_options: self.parse_options.clone(),
            render_options: self.render_options.clone(),
            resolver: Some(resolver),
        }
    }

    /// Check whether local images will be resolved and uploaded.
    pub fn has_image_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Get the configured image resolver.
    pub fn image_resolver(&self) -> Option<&ImageResolver> {
        self.resolver.as_ref()
    }

    /// Convert markdown to an ordered list of blocks.
    ///
    /// Without an image resolver, image syntax is kept as literal text.
    pub fn to_leaflet(&self, markdown: &str) -> Result<Vec<Block>> {
        let parser = MarkdownParser::new(self.parse_options.clone());
        match self.resolver {
            Some(ref resolver) => parser.with_resolver(resolver).parse(markdown),
            None => parser.parse(markdown),
        }
    }

    /// Convert markdown to a single page.
    pub fn to_page(&self, markdown: &str) -> Result<LinearDocument> {
        self.to_leaflet(markdown).map(LinearDocument::from_blocks)
    }

    /// Convert an ordered list of blocks to markdown.
    pub fn from_leaflet(&self, blocks: &[Block]) -> Result<String> {
        self.renderer().render_blocks(blocks)
    }

    /// Convert a whole document to markdown, flattening its pages.
    pub fn document_to_markdown(&self, doc: &Document) -> Result<String> {
        self.renderer().render_document(doc)
    }

    fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::new(self.render_options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Blob;
    use crate::parser::ErrorMode;
    use crate::resolver::UploadError;

    fn fake_uploader(data: &[u8], mime_type: &str) -> std::result::Result<Blob, UploadError> {
        Ok(Blob::new("cid", mime_type, data.len() as u64))
    }

    #[test]
    fn test_converter_default() {
        let converter = MarkdownConverter::new();
        assert!(!converter.has_image_resolver());
        assert_eq!(converter.parse_options.error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_with_image_resolver_returns_new_instance() {
        let base = MarkdownConverter::new().with_parse_options(ParseOptions::new().lenient());
        let configured = base.with_image_resolver(fake_uploader, "/notes");

        assert!(!base.has_image_resolver());
        assert!(configured.has_image_resolver());
        assert_eq!(configured.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(
            configured.image_resolver().map(|r| r.note_dir().to_path_buf()),
            Some(PathBuf::from("/notes"))
        );
    }

    #[test]
    fn test_round_trip_header_paragraph() {
        let converter = MarkdownConverter::new();
        let input = "# Title\n\nBody";
        let blocks = converter.to_leaflet(input).unwrap();
        assert_eq!(blocks, vec![Block::header(1, "Title"), Block::text("Body")]);
        assert_eq!(converter.from_leaflet(&blocks).unwrap(), input);
    }

    #[test]
    fn test_to_page() {
        let page = MarkdownConverter::new().to_page("a\n\nb").unwrap();
        assert_eq!(page.block_count(), 2);
    }

    #[test]
    fn test_converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarkdownConverter>();
    }
}
