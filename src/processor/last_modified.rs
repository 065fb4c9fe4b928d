//! Last-modified processor

use super::Processor;
use crate::content::Content;
use crate::decoder::Mapping;
use crate::error::Result;

/// Sets the last modification time of the source file when the data has none
pub struct LastModifiedProcessor {
    property: String,
}

impl LastModifiedProcessor {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl Default for LastModifiedProcessor {
    fn default() -> Self {
        Self::new("last_modified")
    }
}

impl Processor for LastModifiedProcessor {
    fn process(&self, data: &mut Mapping, _type_name: &str, content: &Content) -> Result<()> {
        if data.contains_key(&self.property) {
            return Ok(());
        }

        if let Some(last_modified) = content.last_modified() {
            data.insert(self.property.clone(), last_modified.to_rfc3339().into());
        }
        Ok(())
    }
}
