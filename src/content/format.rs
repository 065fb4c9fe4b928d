//! Serialization formats of content files

use std::fmt;
use std::path::Path;

/// Serialization format of a content file, used to pick a decoder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Markdown,
    Html,
    Yaml,
    Json,
    /// Any other extension, kept so that a custom decoder can claim it
    Other(String),
}

impl Format {
    /// Extensions recognized out of the box
    pub const KNOWN_EXTENSIONS: [&'static str; 7] =
        ["md", "markdown", "html", "htm", "yaml", "yml", "json"];

    /// Get the format for a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Format::Markdown,
            "html" | "htm" => Format::Html,
            "yaml" | "yml" => Format::Yaml,
            "json" => Format::Json,
            other => Format::Other(other.to_string()),
        }
    }

    /// Get the format of a file from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
    }

    /// Format name, as used in error messages
    pub fn name(&self) -> &str {
        match self {
            Format::Markdown => "markdown",
            Format::Html => "html",
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Other(ext) => ext,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
