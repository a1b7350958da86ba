//! Rendering module for converting block documents to output formats.

mod json;
mod markdown;
mod options;

pub use json::{to_json, JsonFormat};
pub use markdown::{document_to_markdown, to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
