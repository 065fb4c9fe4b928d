//! Processors - mutate decoded data before it is denormalized
//!
//! Processors run in registration order over every decoded mapping. A
//! processor that needs to look up other contents (to resolve references
//! between items) overrides [`Processor::attach`]; the manager hands itself
//! to every processor once, when it is built.

mod date;
mod last_modified;
mod references;
mod slug;
mod title;

pub use date::{parse_date_string, DateProcessor};
pub use last_modified::LastModifiedProcessor;
pub use references::ResolveReferencesProcessor;
pub use slug::SlugProcessor;
pub use title::ExtractTitleProcessor;

use std::rc::Weak;

use crate::content::Content;
use crate::decoder::Mapping;
use crate::error::{ContentError, Result};
use crate::manager::ContentManager;

/// A mutator applied to decoded data
pub trait Processor {
    fn process(&self, data: &mut Mapping, type_name: &str, content: &Content) -> Result<()>;

    /// Receive a handle on the manager running this processor
    ///
    /// Called exactly once, before any content is loaded.
    fn attach(&mut self, _manager: Weak<ContentManager>) {}
}

/// Processors registered by default, in order
pub fn default_processors() -> Vec<Box<dyn Processor>> {
    vec![
        Box::new(SlugProcessor::default()),
        Box::new(LastModifiedProcessor::default()),
        Box::new(DateProcessor::default()),
        Box::new(ExtractTitleProcessor::default()),
    ]
}

pub(crate) fn processor_error(
    name: &str,
    content: &Content,
    message: impl Into<String>,
) -> ContentError {
    ContentError::Processor {
        name: name.to_string(),
        slug: content.slug().to_string(),
        message: message.into(),
    }
}
