//! Content record

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use super::Format;

/// One file-backed content item, before decoding
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    slug: String,
    format: Format,
    raw_content: String,
    path: Option<PathBuf>,
    last_modified: Option<DateTime<Local>>,
}

impl Content {
    /// Create a new content record with the minimal required fields
    pub fn new(slug: impl Into<String>, format: Format, raw_content: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            format,
            raw_content: raw_content.into(),
            path: None,
            last_modified: None,
        }
    }

    /// Attach the source file path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the last modification time of the source
    pub fn with_last_modified(mut self, last_modified: DateTime<Local>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Identifier of the item within its provider
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Unparsed body
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// Source file, when the item is file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn last_modified(&self) -> Option<&DateTime<Local>> {
        self.last_modified.as_ref()
    }
}
