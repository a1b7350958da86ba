//! Markdown to block conversion.
//!
//! The parser is a single forward scan over the input lines with at most
//! one block open at a time. It recognizes ATX headers, fenced code blocks,
//! stand-alone images and paragraphs; everything else is paragraph text.

use std::sync::OnceLock;

use regex::Regex;

use super::{ErrorMode, ParseOptions};
use crate::error::{Error, Result};
use crate::model::Block;
use crate::resolver::ImageResolver;

/// Parse markdown into blocks. Image references stay literal text.
pub fn parse_markdown(markdown: &str, options: &ParseOptions) -> Result<Vec<Block>> {
    MarkdownParser::new(options.clone()).parse(markdown)
}

/// Markdown parser.
#[derive(Debug, Clone)]
pub struct MarkdownParser<'r> {
    options: ParseOptions,
    resolver: Option<&'r ImageResolver>,
}

impl<'r> MarkdownParser<'r> {
    /// Create a new parser without image resolution.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            resolver: None,
        }
    }

    /// Resolve and upload local images through `resolver`.
    pub fn with_resolver(mut self, resolver: &'r ImageResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Parse markdown into an ordered list of blocks.
    ///
    /// On error nothing is returned but the error: a document is either
    /// converted whole or not at all.
    ///
    /// Line endings are not preserved: `\r\n` reads as `\n`, and trailing
    /// newlines at the end of the input are not part of any block, so
    /// `"Hello\n"` and `"Hello"` produce the same blocks.
    pub fn parse(&self, markdown: &str) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut lines = markdown.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            match classify(line) {
                Line::Blank => flush_paragraph(&mut paragraph, &mut blocks),
                Line::Header { level, text } => {
                    flush_paragraph(&mut paragraph, &mut blocks);
                    blocks.push(Block::header(level, text));
                }
                Line::Fence { fence_len, language } => {
                    flush_paragraph(&mut paragraph, &mut blocks);
                    let block =
                        self.read_code_block(index + 1, fence_len, language, &mut lines)?;
                    blocks.push(block);
                }
                Line::Image { alt, src } => match self.resolver {
                    Some(resolver) if ImageResolver::is_local(src) => {
                        flush_paragraph(&mut paragraph, &mut blocks);
                        let image = resolver.resolve(src, &unescape_alt(alt))?;
                        blocks.push(Block::Image(image));
                    }
                    _ => paragraph.push(line),
                },
                Line::Text => paragraph.push(line),
            }
        }
        flush_paragraph(&mut paragraph, &mut blocks);

        log::debug!(
            "Parsed {} blocks from {} bytes of markdown",
            blocks.len(),
            markdown.len()
        );
        Ok(blocks)
    }

    /// Consume lines up to the closing fence. `start_line` is the 1-indexed
    /// line of the opening fence.
    fn read_code_block<'a, I>(
        &self,
        start_line: usize,
        fence_len: usize,
        language: Option<&str>,
        lines: &mut I,
    ) -> Result<Block>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        let mut body: Vec<&str> = Vec::new();
        for (_, line) in lines {
            if is_closing_fence(line, fence_len) {
                return Ok(Block::code(language, body.join("\n")));
            }
            body.push(line);
        }

        match self.options.error_mode {
            ErrorMode::Strict => Err(Error::UnterminatedCodeFence { line: start_line }),
            ErrorMode::Lenient => {
                log::warn!(
                    "Code fence opened at line {} is never closed; closing at end of input",
                    start_line
                );
                Ok(Block::code(language, body.join("\n")))
            }
        }
    }
}

/// Classification of a single source line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Header { level: u8, text: &'a str },
    Fence {
        fence_len: usize,
        language: Option<&'a str>,
    },
    Image { alt: &'a str, src: &'a str },
    Text,
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }

    if let Some(caps) = header_pattern().captures(line) {
        let text = caps.get(2).map_or("", |m| m.as_str()).trim();
        if !text.is_empty() {
            let level = caps.get(1).map_or(1, |m| m.len()) as u8;
            return Line::Header { level, text };
        }
    }

    if let Some(caps) = fence_pattern().captures(line) {
        let fence_len = caps.get(1).map_or(3, |m| m.len());
        let language = caps
            .get(2)
            .and_then(|m| m.as_str().split_whitespace().next());
        return Line::Fence {
            fence_len,
            language,
        };
    }

    if let Some(caps) = image_pattern().captures(line) {
        if let (Some(alt), Some(src)) = (caps.get(1), caps.get(2)) {
            return Line::Image {
                alt: alt.as_str(),
                src: src.as_str(),
            };
        }
    }

    Line::Text
}

/// A closing fence repeats the opening backticks exactly.
fn is_closing_fence(line: &str, fence_len: usize) -> bool {
    let line = line.trim_end();
    line.len() == fence_len && line.bytes().all(|b| b == b'`')
}

/// Undo the `\\`, `\[` and `\]` escapes the renderer applies to alt text.
fn unescape_alt(alt: &str) -> String {
    let mut out = String::with_capacity(alt.len());
    let mut chars = alt.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\\' | '[' | ']')) => out.push(next),
                Some(next) => {
                    out.push(c);
                    out.push(next);
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::text(paragraph.join("\n")));
        paragraph.clear();
    }
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").expect("valid header pattern"))
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(`{3,})([^`]*)$").expect("valid fence pattern"))
}

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*!\[((?:\\.|[^\\\]])*)\]\(([^\s)]+)(?:\s+"[^"]*")?\)\s*$"#)
            .expect("valid image pattern")
    })
}
