//! Content providers - where raw content comes from
//!
//! A provider serves the [`Content`] records of one or more model types. The
//! manager asks every provider supporting a type for its records, so a type
//! can be spread over several directories or sources.

mod factory;
mod filesystem;

pub use factory::{ContentProviderFactory, LocalFilesystemProviderFactory, ProviderFactory};
pub use filesystem::LocalFilesystemProvider;

use crate::content::Content;
use crate::error::Result;

/// Lazy listing of content records; each record is read when reached
pub type ContentIter<'a> = Box<dyn Iterator<Item = Result<Content>> + 'a>;

/// A source of content records
pub trait ContentProvider {
    /// Whether this provider serves contents of the given model type
    fn supports(&self, type_name: &str) -> bool;

    /// Enumerate every content record of this provider
    fn list_contents(&self) -> Result<ContentIter<'_>>;

    /// Fetch a single record by slug, `None` when this provider has no such item
    fn get_content(&self, slug: &str) -> Result<Option<Content>>;
}
