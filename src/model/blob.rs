//! Uploaded binary references.

use serde::{Deserialize, Serialize};

/// Content-addressed link to uploaded data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobLink {
    /// Content identifier (CID)
    #[serde(rename = "$link")]
    pub link: String,
}

/// An opaque reference to uploaded binary data.
///
/// Produced by a [`BlobUploader`](crate::resolver::BlobUploader). The converter
/// stores and forwards it but never looks inside, except to render the
/// content id as an image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type", rename = "blob", rename_all = "camelCase")]
pub struct Blob {
    /// Content link
    #[serde(rename = "ref")]
    pub reference: BlobLink,

    /// MIME type of the uploaded data (e.g., "image/png")
    pub mime_type: String,

    /// Size of the uploaded data in bytes
    pub size: u64,
}

impl Blob {
    /// Create a new blob reference.
    pub fn new(cid: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            reference: BlobLink { link: cid.into() },
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Get the content id.
    pub fn cid(&self) -> &str {
        &self.reference.link
    }
}
