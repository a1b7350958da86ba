//! Local image resolution and upload.
//!
//! Markdown refers to images by path; a published document refers to them
//! by uploaded blob. An [`ImageResolver`] bridges the two: it locates the
//! image relative to the note's directory, reads and inspects it, and hands
//! the bytes to a caller-supplied [`BlobUploader`].
//!
//! # Example
//!
//! ```
//! use leafmark::model::Blob;
//! use leafmark::resolver::{ImageResolver, UploadError};
//!
//! let resolver = ImageResolver::new(
//!     |data: &[u8], mime_type: &str| -> Result<Blob, UploadError> {
//!         Ok(Blob::new("bafkrei-example", mime_type, data.len() as u64))
//!     },
//!     "/home/me/notes",
//! );
//! assert_eq!(resolver.note_dir(), std::path::Path::new("/home/me/notes"));
//! ```

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{Blob, ImageBlock};

/// Error type returned by uploaders. Propagated verbatim inside
/// [`Error::Upload`].
pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// Capability that stores binary data remotely and returns a reference to it.
///
/// The converter performs no retries and imposes no timeout; implementations
/// that need either must build them in.
pub trait BlobUploader: Send + Sync {
    /// Upload `data` of the given MIME type.
    fn upload(&self, data: &[u8], mime_type: &str) -> std::result::Result<Blob, UploadError>;
}

impl<F> BlobUploader for F
where
    F: Fn(&[u8], &str) -> std::result::Result<Blob, UploadError> + Send + Sync,
{
    fn upload(&self, data: &[u8], mime_type: &str) -> std::result::Result<Blob, UploadError> {
        self(data, mime_type)
    }
}

/// Resolves markdown image references against a note directory and uploads them.
#[derive(Clone)]
pub struct ImageResolver {
    uploader: Arc<dyn BlobUploader>,
    note_dir: PathBuf,
}

impl ImageResolver {
    /// Create a resolver uploading through `uploader`, resolving relative
    /// paths against `note_dir`.
    pub fn new(uploader: impl BlobUploader + 'static, note_dir: impl Into<PathBuf>) -> Self {
        Self::from_shared(Arc::new(uploader), note_dir)
    }

    /// Create a resolver from an uploader that is already shared.
    pub fn from_shared(uploader: Arc<dyn BlobUploader>, note_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploader,
            note_dir: note_dir.into(),
        }
    }

    /// Directory that relative image paths are resolved against.
    pub fn note_dir(&self) -> &Path {
        &self.note_dir
    }

    /// Check whether a markdown image source refers to a local file.
    ///
    /// Anything with a URL scheme (`https:`, `data:`, ...) is remote.
    pub fn is_local(src: &str) -> bool {
        !has_url_scheme(src)
    }

    /// Turn a markdown image source into a filesystem path.
    ///
    /// Relative sources are joined to the note directory. `.` and `..`
    /// segments are resolved lexically, so the file does not need to exist.
    /// The result must stay inside the note directory; absolute sources are
    /// accepted only when they point into it.
    pub fn resolve_path(&self, src: &str) -> Result<PathBuf> {
        let note_dir = normalize(&self.note_dir);
        let path = normalize(&note_dir.join(src));
        if !path.starts_with(&note_dir) {
            return Err(Error::ImageOutsideNoteDir { path, note_dir });
        }
        Ok(path)
    }

    /// Read, inspect and upload the image at `src`, producing an image block.
    ///
    /// Fails without uploading if the path leaves the note directory, the
    /// file cannot be read, or it is not a recognizable image.
    pub fn resolve(&self, src: &str, alt: &str) -> Result<ImageBlock> {
        let path = self.resolve_path(src)?;

        let data = std::fs::read(&path).map_err(|source| Error::ImageRead {
            path: path.clone(),
            source,
        })?;

        let mime_type = detect::detect_mime_type(&data)
            .ok_or_else(|| Error::UnknownImageFormat { path: path.clone() })?;

        let (width, height) = detect::image_dimensions(&data).map_err(|message| {
            Error::ImageDecode {
                path: path.clone(),
                message,
            }
        })?;

        log::debug!(
            "Uploading {} ({}, {} bytes, {}x{})",
            path.display(),
            mime_type,
            data.len(),
            width,
            height
        );

        let blob = self
            .uploader
            .upload(&data, mime_type)
            .map_err(|source| Error::Upload {
                path: path.clone(),
                source,
            })?;

        Ok(ImageBlock::new(blob, width, height, alt))
    }
}

impl fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResolver")
            .field("note_dir", &self.note_dir)
            .finish_non_exhaustive()
    }
}

/// Resolve `.` and `..` segments without touching the filesystem.
///
/// `..` at the root of an absolute path stays at the root; leading `..` of a
/// relative path are kept.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// `scheme:` prefix per RFC 3986, at least two characters long so that
/// Windows drive letters (`C:\...`) are not mistaken for schemes.
fn has_url_scheme(src: &str) -> bool {
    match src.find(':') {
        Some(idx) if idx >= 2 => {
            let scheme = &src[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_uploader(data: &[u8], mime_type: &str) -> std::result::Result<Blob, UploadError> {
        Ok(Blob::new("cid", mime_type, data.len() as u64))
    }

    #[test]
    fn test_is_local() {
        assert!(ImageResolver::is_local("images/cat.png"));
        assert!(ImageResolver::is_local("./cat.png"));
        assert!(ImageResolver::is_local("/abs/cat.png"));
        assert!(ImageResolver::is_local("C:\\notes\\cat.png"));
        assert!(!ImageResolver::is_local("https://example.com/cat.png"));
        assert!(!ImageResolver::is_local("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_resolve_path() {
        let resolver = ImageResolver::new(noop_uploader, "/notes");
        assert_eq!(
            resolver.resolve_path("img/cat.png").unwrap(),
            PathBuf::from("/notes/img/cat.png")
        );
        assert_eq!(
            resolver.resolve_path("./img/../cat.png").unwrap(),
            PathBuf::from("/notes/cat.png")
        );
        assert_eq!(
            resolver.resolve_path("/notes/img/cat.png").unwrap(),
            PathBuf::from("/notes/img/cat.png")
        );
    }

    #[test]
    fn test_resolve_path_outside_note_dir() {
        let resolver = ImageResolver::new(noop_uploader, "/notes/journal");
        for src in [
            "../secret.png",
            "img/../../secret.png",
            "/elsewhere/cat.png",
            "/notes/journal/../other/cat.png",
            "/notes/journal-old/cat.png",
        ] {
            let err = resolver.resolve_path(src).unwrap_err();
            assert!(
                matches!(err, Error::ImageOutsideNoteDir { .. }),
                "{} should be rejected, got {:?}",
                src,
                err
            );
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize(Path::new("notes/./img")), PathBuf::from("notes/img"));
    }

    #[test]
    fn test_missing_file_never_uploads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resolver = ImageResolver::new(
            move |data: &[u8], mime_type: &str| {
                counter.fetch_add(1, Ordering::SeqCst);
                noop_uploader(data, mime_type)
            },
            "/definitely/not/a/real/dir",
        );

        let err = resolver.resolve("missing.png", "alt").unwrap_err();
        assert!(matches!(err, Error::ImageRead { .. }));
        assert_eq!(
            err.path(),
            Some(Path::new("/definitely/not/a/real/dir/missing.png"))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_hides_uploader() {
        let resolver = ImageResolver::new(noop_uploader, "/notes");
        let debug = format!("{:?}", resolver);
        assert!(debug.contains("/notes"));
    }
}
