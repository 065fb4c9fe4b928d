//! Content module - the raw content record handed out by providers

mod format;
mod record;

pub use format::Format;
pub use record::Content;
