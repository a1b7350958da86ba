//! Block-level types.

use super::Blob;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lexicon type of a header block.
pub const HEADER_TYPE: &str = "pub.leaflet.blocks.header";
/// Lexicon type of a text block.
pub const TEXT_TYPE: &str = "pub.leaflet.blocks.text";
/// Lexicon type of a code block.
pub const CODE_TYPE: &str = "pub.leaflet.blocks.code";
/// Lexicon type of an image block.
pub const IMAGE_TYPE: &str = "pub.leaflet.blocks.image";

const KNOWN_TYPES: [&str; 4] = [HEADER_TYPE, TEXT_TYPE, CODE_TYPE, IMAGE_TYPE];

/// A content block on a page.
///
/// The set of variants is closed: anything that matches on a block handles
/// every kind. [`Block::Unknown`] is only ever produced when decoding a
/// fetched document that contains a block type this crate does not model.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A heading
    Header(HeaderBlock),

    /// A paragraph of plain text
    Text(TextBlock),

    /// A fenced code block
    Code(CodeBlock),

    /// An uploaded image
    Image(ImageBlock),

    /// A block of an unrecognized lexicon type, kept as raw JSON
    Unknown(UnknownBlock),
}

impl Block {
    /// Create a header block. The level is clamped to 1..=6.
    pub fn header(level: u8, text: impl Into<String>) -> Self {
        Block::Header(HeaderBlock::new(level, text))
    }

    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(TextBlock::new(text))
    }

    /// Create a code block.
    pub fn code(language: Option<&str>, text: impl Into<String>) -> Self {
        Block::Code(CodeBlock::new(language, text))
    }

    /// Create an image block.
    pub fn image(blob: Blob, width: u32, height: u32, alt: impl Into<String>) -> Self {
        Block::Image(ImageBlock::new(blob, width, height, alt))
    }

    /// Lexicon type name of this block.
    pub fn type_name(&self) -> &str {
        match self {
            Block::Header(_) => HEADER_TYPE,
            Block::Text(_) => TEXT_TYPE,
            Block::Code(_) => CODE_TYPE,
            Block::Image(_) => IMAGE_TYPE,
            Block::Unknown(b) => &b.type_name,
        }
    }

    /// Plain text carried by the block, if it has any.
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            Block::Header(b) => Some(&b.plaintext),
            Block::Text(b) => Some(&b.plaintext),
            Block::Code(b) => Some(&b.plaintext),
            Block::Image(_) | Block::Unknown(_) => None,
        }
    }

    /// Check if this block is a header.
    pub fn is_header(&self) -> bool {
        matches!(self, Block::Header(_))
    }

    /// Check if this block is a text block.
    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text(_))
    }

    /// Check if this block is a code block.
    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code(_))
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image(_))
    }
}

/// A heading with a level from 1 to 6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    /// Heading level (1 = top level)
    #[serde(default = "default_level")]
    pub level: u8,

    /// Heading text
    pub plaintext: String,
}

fn default_level() -> u8 {
    1
}

impl HeaderBlock {
    /// Create a header. The level is clamped to 1..=6.
    pub fn new(level: u8, plaintext: impl Into<String>) -> Self {
        Self {
            level: level.clamp(1, 6),
            plaintext: plaintext.into(),
        }
    }
}

/// A paragraph of plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Paragraph text, with interior line breaks preserved
    pub plaintext: String,
}

impl TextBlock {
    /// Create a text block.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self {
            plaintext: plaintext.into(),
        }
    }
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Code content, without the fences
    pub plaintext: String,

    /// Language from the fence info string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl CodeBlock {
    /// Create a code block. An empty language is treated as none.
    pub fn new(language: Option<&str>, plaintext: impl Into<String>) -> Self {
        Self {
            plaintext: plaintext.into(),
            language: language.filter(|l| !l.is_empty()).map(str::to_string),
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    /// Uploaded image data
    pub image: Blob,

    /// Image dimensions
    pub aspect_ratio: AspectRatio,

    /// Alternative text
    #[serde(default)]
    pub alt: String,
}

impl ImageBlock {
    /// Create an image block.
    pub fn new(image: Blob, width: u32, height: u32, alt: impl Into<String>) -> Self {
        Self {
            image,
            aspect_ratio: AspectRatio { width, height },
            alt: alt.into(),
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.aspect_ratio.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.aspect_ratio.height
    }
}

/// A block whose lexicon type is not modeled, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    /// The block's `$type`
    pub type_name: String,
    /// The block as received
    pub raw: Value,
}

#[derive(Serialize)]
#[serde(tag = "$type")]
enum TaggedRef<'a> {
    #[serde(rename = "pub.leaflet.blocks.header")]
    Header(&'a HeaderBlock),
    #[serde(rename = "pub.leaflet.blocks.text")]
    Text(&'a TextBlock),
    #[serde(rename = "pub.leaflet.blocks.code")]
    Code(&'a CodeBlock),
    #[serde(rename = "pub.leaflet.blocks.image")]
    Image(&'a ImageBlock),
}

#[derive(Deserialize)]
#[serde(tag = "$type")]
enum Tagged {
    #[serde(rename = "pub.leaflet.blocks.header")]
    Header(HeaderBlock),
    #[serde(rename = "pub.leaflet.blocks.text")]
    Text(TextBlock),
    #[serde(rename = "pub.leaflet.blocks.code")]
    Code(CodeBlock),
    #[serde(rename = "pub.leaflet.blocks.image")]
    Image(ImageBlock),
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Block::Header(b) => TaggedRef::Header(b).serialize(serializer),
            Block::Text(b) => TaggedRef::Text(b).serialize(serializer),
            Block::Code(b) => TaggedRef::Code(b).serialize(serializer),
            Block::Image(b) => TaggedRef::Image(b).serialize(serializer),
            Block::Unknown(b) => b.raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let type_name = raw
            .get("$type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("$type"))?
            .to_string();

        if !KNOWN_TYPES.contains(&type_name.as_str()) {
            return Ok(Block::Unknown(UnknownBlock { type_name, raw }));
        }

        let tagged = Tagged::deserialize(raw).map_err(de::Error::custom)?;
        Ok(match tagged {
            Tagged::Header(b) => Block::Header(b),
            Tagged::Text(b) => Block::Text(b),
            Tagged::Code(b) => Block::Code(b),
            Tagged::Image(b) => Block::Image(b),
        })
    }
}
