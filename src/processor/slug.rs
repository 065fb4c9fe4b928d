//! Slug processor

use super::Processor;
use crate::content::Content;
use crate::decoder::Mapping;
use crate::error::Result;

/// Sets the slug property from the content record when the data has none
pub struct SlugProcessor {
    property: String,
}

impl SlugProcessor {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl Default for SlugProcessor {
    fn default() -> Self {
        Self::new("slug")
    }
}

impl Processor for SlugProcessor {
    fn process(&self, data: &mut Mapping, _type_name: &str, content: &Content) -> Result<()> {
        if !data.contains_key(&self.property) {
            data.insert(self.property.clone(), content.slug().into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Format;
    use serde_json::json;

    #[test]
    fn test_sets_missing_slug() {
        let content = Content::new("blog/hello", Format::Markdown, "");
        let mut data = Mapping::new();

        SlugProcessor::default()
            .process(&mut data, "article", &content)
            .unwrap();
        assert_eq!(data["slug"], json!("blog/hello"));
    }

    #[test]
    fn test_keeps_explicit_slug() {
        let content = Content::new("blog/hello", Format::Markdown, "");
        let mut data = Mapping::new();
        data.insert("id".to_string(), json!("custom"));

        SlugProcessor::new("id")
            .process(&mut data, "article", &content)
            .unwrap();
        assert_eq!(data["id"], json!("custom"));
    }
}
