//! Markdown rendering for block documents.
//!
//! Each block renders to one markdown fragment; fragments are joined with a
//! single blank line. For the constructs the parser understands this is its
//! exact inverse.

use crate::error::{Error, Result};
use crate::model::{Block, CodeBlock, Document, HeaderBlock, ImageBlock};

use super::RenderOptions;

/// Separator placed between rendered blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Convert an ordered list of blocks to markdown.
pub fn to_markdown(blocks: &[Block], options: &RenderOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render_blocks(blocks)
}

/// Convert a whole document to markdown. Page boundaries are not marked.
pub fn document_to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render_document(doc)
}

/// Markdown renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render blocks in order. An empty sequence renders as the empty string.
    pub fn render_blocks<'a, I>(&self, blocks: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let fragments = blocks
            .into_iter()
            .map(|block| self.render_block(block))
            .collect::<Result<Vec<_>>>()?;
        Ok(fragments.join(BLOCK_SEPARATOR))
    }

    /// Render every page of a document as one flat block sequence.
    pub fn render_document(&self, doc: &Document) -> Result<String> {
        let body = self.render_blocks(doc.blocks())?;
        log::debug!(
            "Rendered {} blocks from {} pages",
            doc.block_count(),
            doc.page_count()
        );

        if !self.options.include_frontmatter {
            return Ok(body);
        }

        let frontmatter = doc.to_yaml_frontmatter();
        if body.is_empty() {
            Ok(frontmatter)
        } else {
            Ok(format!("{}{}{}", frontmatter, BLOCK_SEPARATOR, body))
        }
    }

    /// Render a single block to its markdown fragment.
    pub fn render_block(&self, block: &Block) -> Result<String> {
        match block {
            Block::Header(h) => render_header(h),
            Block::Text(t) => Ok(t.plaintext.clone()),
            Block::Code(c) => Ok(render_code(c)),
            Block::Image(i) => Ok(self.render_image(i)),
            Block::Unknown(u) => Err(Error::UnsupportedBlock(u.type_name.clone())),
        }
    }

    fn render_image(&self, image: &ImageBlock) -> String {
        format!(
            "![{}]({}{})",
            escape_alt(&image.alt),
            self.options.image_path_prefix,
            image.image.cid()
        )
    }
}

fn render_header(header: &HeaderBlock) -> Result<String> {
    if header.level == 0 {
        return Err(Error::InvalidHeaderLevel(header.level));
    }
    let level = if header.level > 6 {
        log::warn!("Header level {} rendered as level 6", header.level);
        6
    } else {
        header.level
    };
    Ok(format!("{} {}", "#".repeat(level as usize), header.plaintext))
}

/// Render a fenced code block. The fence is three backticks unless the body
/// holds a line of three or more backticks, in which case it is one longer.
fn render_code(code: &CodeBlock) -> String {
    let longest_inner = code
        .plaintext
        .lines()
        .map(str::trim_end)
        .filter(|line| line.len() >= 3 && line.bytes().all(|b| b == b'`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_inner.max(2) + 1);
    format!(
        "{}{}\n{}\n{}",
        fence,
        code.language.as_deref().unwrap_or(""),
        code.plaintext,
        fence
    )
}

fn escape_alt(alt: &str) -> String {
    let mut out = String::with_capacity(alt.len());
    for c in alt.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Blob, LinearDocument, UnknownBlock};
    use chrono::{TimeZone, Utc};

    fn render(blocks: &[Block]) -> Result<String> {
        to_markdown(blocks, &RenderOptions::default())
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]).unwrap(), "");
    }

    #[test]
    fn test_render_header_and_text() {
        let blocks = vec![Block::header(1, "Main Title"), Block::text("Content here")];
        assert_eq!(render(&blocks).unwrap(), "# Main Title\n\nContent here");
    }

    #[test]
    fn test_render_code() {
        let blocks = vec![Block::code(Some("go"), "fmt.Println(\"hello\")")];
        assert_eq!(
            render(&blocks).unwrap(),
            "```go\nfmt.Println(\"hello\")\n```"
        );

        let blocks = vec![Block::code(None, "plain")];
        assert_eq!(render(&blocks).unwrap(), "```\nplain\n```");
    }

    #[test]
    fn test_render_image() {
        let blocks = vec![Block::image(
            Blob::new("bafkreicat", "image/png", 3),
            2,
            2,
            "a cat",
        )];
        assert_eq!(render(&blocks).unwrap(), "![a cat](bafkreicat)");

        let options = RenderOptions::new().with_image_prefix("https://cdn.example/");
        assert_eq!(
            to_markdown(&blocks, &options).unwrap(),
            "![a cat](https://cdn.example/bafkreicat)"
        );
    }

    #[test]
    fn test_render_code_with_inner_fence() {
        let blocks = vec![Block::code(Some("md"), "```\ninner\n```")];
        assert_eq!(
            render(&blocks).unwrap(),
            "````md\n```\ninner\n```\n````"
        );

        let blocks = vec![Block::code(None, "`````")];
        assert_eq!(render(&blocks).unwrap(), "``````\n`````\n``````");

        let blocks = vec![Block::code(None, "let s = \"```\";")];
        assert_eq!(render(&blocks).unwrap(), "```\nlet s = \"```\";\n```");
    }

    #[test]
    fn test_render_image_escapes_alt() {
        let blocks = vec![Block::image(
            Blob::new("bafk", "image/png", 3),
            1,
            1,
            r"figure [1] \ detail",
        )];
        assert_eq!(
            render(&blocks).unwrap(),
            r"![figure \[1\] \\ detail](bafk)"
        );
    }

    #[test]
    fn test_render_header_levels() {
        assert_eq!(render(&[Block::header(6, "Deep")]).unwrap(), "###### Deep");

        let too_deep = Block::Header(HeaderBlock {
            level: 9,
            plaintext: "Deeper".into(),
        });
        assert_eq!(render(&[too_deep]).unwrap(), "###### Deeper");

        let zero = Block::Header(HeaderBlock {
            level: 0,
            plaintext: "Nothing".into(),
        });
        assert!(matches!(
            render(&[zero]).unwrap_err(),
            Error::InvalidHeaderLevel(0)
        ));
    }

    #[test]
    fn test_render_unknown_block_fails() {
        let blocks = vec![
            Block::text("kept?"),
            Block::Unknown(UnknownBlock {
                type_name: "pub.leaflet.blocks.math".into(),
                raw: serde_json::json!({"$type": "pub.leaflet.blocks.math", "tex": "x^2"}),
            }),
        ];
        match render(&blocks) {
            Err(Error::UnsupportedBlock(name)) => assert_eq!(name, "pub.leaflet.blocks.math"),
            other => panic!("expected unsupported block error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_document_flattens_pages() {
        let doc = Document::new("did:plc:abc", "Two pages")
            .with_page(LinearDocument::from_blocks(vec![Block::text("Page one")]))
            .with_page(LinearDocument::from_blocks(vec![Block::text("Page two")]));

        let markdown = document_to_markdown(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(markdown, "Page one\n\nPage two");
    }

    #[test]
    fn test_render_document_with_frontmatter() {
        let mut doc = Document::new("did:plc:abc", "Notes")
            .with_page(LinearDocument::from_blocks(vec![Block::text("Body")]));
        doc.publish(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());

        let options = RenderOptions::new().with_frontmatter(true);
        let markdown = document_to_markdown(&doc, &options).unwrap();
        assert!(markdown.starts_with("---\ntitle: \"Notes\"\n"));
        assert!(markdown.ends_with("---\n\nBody"));
    }

    #[test]
    fn test_render_empty_document_with_frontmatter() {
        let doc = Document::new("", "Empty");
        let options = RenderOptions::new().with_frontmatter(true);
        let markdown = document_to_markdown(&doc, &options).unwrap();
        assert_eq!(markdown, "---\ntitle: \"Empty\"\n---");
    }
}
