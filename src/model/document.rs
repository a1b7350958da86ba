//! Document-level types.

use super::{Block, LinearDocument};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lexicon type of a document record.
pub const DOCUMENT_TYPE: &str = "pub.leaflet.document";

/// A publishable document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type", rename = "pub.leaflet.document", rename_all = "camelCase")]
pub struct Document {
    /// Author identity (an opaque DID string)
    pub author: String,

    /// Document title
    pub title: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Publication the document belongs to, if any (AT URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,

    /// Pages in the document
    #[serde(default)]
    pub pages: Vec<LinearDocument>,

    /// Publication time; `None` marks a draft
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_published_at"
    )]
    pub published_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a new empty draft document.
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the owning publication.
    pub fn with_publication(mut self, uri: impl Into<String>) -> Self {
        self.publication = Some(uri.into());
        self
    }

    /// Append a page.
    pub fn with_page(mut self, page: LinearDocument) -> Self {
        self.pages.push(page);
        self
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: LinearDocument) {
        self.pages.push(page);
    }

    /// Mark the document as published at the given time.
    pub fn publish(&mut self, at: DateTime<Utc>) {
        self.published_at = Some(at);
    }

    /// Set the publication time from an RFC 3339 string. An empty string
    /// marks the document as a draft.
    pub fn set_published_at(&mut self, value: &str) -> Result<()> {
        self.published_at = parse_timestamp(value)?;
        Ok(())
    }

    /// Check if the document is an unpublished draft.
    pub fn is_draft(&self) -> bool {
        self.published_at.is_none()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over every block of every page, in page order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|page| page.blocks.iter())
    }

    /// Total number of blocks across all pages.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(LinearDocument::block_count).sum()
    }

    /// Convert document fields to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("title: \"{}\"", escape_yaml(&self.title)));
        if !self.author.is_empty() {
            lines.push(format!("author: \"{}\"", escape_yaml(&self.author)));
        }
        if !self.description.is_empty() {
            lines.push(format!("description: \"{}\"", escape_yaml(&self.description)));
        }
        if let Some(ref published_at) = self.published_at {
            lines.push(format!("published_at: {}", published_at.to_rfc3339()));
        }

        lines.push("---".to_string());
        lines.join("\n")
    }
}

/// Parse an RFC 3339 timestamp; empty input means "no timestamp".
pub(crate) fn parse_timestamp(value: &str) -> Result<Option<DateTime<Utc>>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| Error::InvalidTimestamp(value.to_string()))
}

fn deserialize_published_at<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_timestamp(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
