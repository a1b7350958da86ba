//! Parsing module: markdown and Leaflet JSON into the block model.

mod json;
mod markdown;
mod options;

pub use json::{blocks_from_json, from_json};
pub use markdown::{parse_markdown, MarkdownParser};
pub use options::{ErrorMode, ParseOptions};
