//! Error types for leafmark library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::resolver::UploadError;

/// Result type alias for leafmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting between markdown and blocks.
///
/// A conversion that fails never yields a partial document: the caller gets
/// the error alone and must discard the attempt.
#[derive(Error, Debug)]
pub enum Error {
    /// A fenced code block was opened but never closed.
    #[error("Parse error at line {line}: unterminated code fence")]
    UnterminatedCodeFence {
        /// 1-indexed line of the opening fence
        line: usize,
    },

    /// A local image referenced from markdown could not be read.
    #[error("Failed to read image {}: {source}", path.display())]
    ImageRead {
        /// Resolved filesystem path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A local image reference resolves outside the note directory.
    #[error("Image {} is outside the note directory {}", path.display(), note_dir.display())]
    ImageOutsideNoteDir {
        /// Resolved filesystem path
        path: PathBuf,
        /// Directory relative references must stay within
        note_dir: PathBuf,
    },

    /// The image bytes do not match any supported image format.
    #[error("Unrecognized image format: {}", path.display())]
    UnknownImageFormat {
        /// Resolved filesystem path
        path: PathBuf,
    },

    /// The image format was recognized but its dimensions could not be decoded.
    #[error("Failed to decode image {}: {message}", path.display())]
    ImageDecode {
        /// Resolved filesystem path
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// The injected uploader rejected an image.
    #[error("Upload failed for {}: {source}", path.display())]
    Upload {
        /// Resolved filesystem path of the image being uploaded
        path: PathBuf,
        /// Error returned verbatim by the uploader
        #[source]
        source: UploadError,
    },

    /// A block of a type the markdown serializer does not handle.
    #[error("Unsupported block type: {0}")]
    UnsupportedBlock(String),

    /// A header block with a level outside the representable range.
    #[error("Invalid header level {0}: must be at least 1")]
    InvalidHeaderLevel(u8),

    /// JSON (de)serialization of the wire format failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record whose `$type` is missing or is not a Leaflet document.
    #[error("Unexpected record type: {}", .0.as_deref().unwrap_or("<missing>"))]
    UnexpectedRecordType(Option<String>),

    /// A `publishedAt` value that is not an RFC 3339 timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl Error {
    /// Classify this error into one of the broad failure families.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnterminatedCodeFence { .. }
            | Error::ImageRead { .. }
            | Error::ImageOutsideNoteDir { .. }
            | Error::UnknownImageFormat { .. }
            | Error::ImageDecode { .. } => ErrorKind::Parse,
            Error::Upload { .. } => ErrorKind::Upload,
            Error::UnsupportedBlock(_) | Error::InvalidHeaderLevel(_) => {
                ErrorKind::UnsupportedBlock
            }
            Error::Json(_) | Error::UnexpectedRecordType(_) | Error::InvalidTimestamp(_) => {
                ErrorKind::Serialization
            }
        }
    }

    /// The filesystem path involved in an image failure, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::ImageRead { path, .. }
            | Error::ImageOutsideNoteDir { path, .. }
            | Error::UnknownImageFormat { path }
            | Error::ImageDecode { path, .. }
            | Error::Upload { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Broad error families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed markdown or an unreadable image reference
    Parse,
    /// The uploader callback failed
    Upload,
    /// The serializer was handed a block it cannot render
    UnsupportedBlock,
    /// Wire format encoding or decoding failed
    Serialization,
}
