//! Rendering options and configuration.

/// Options for rendering blocks back to markdown.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prefix placed before a blob's content id in image references
    /// (e.g., "https://cdn.example.com/blobs/")
    pub image_path_prefix: String,

    /// Include YAML frontmatter when rendering a whole document
    pub include_frontmatter: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }
}
