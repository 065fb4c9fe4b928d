//! Title extraction from HTML content

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::Processor;
use crate::content::Content;
use crate::decoder::Mapping;
use crate::error::Result;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Uses the first `<h1>` of the rendered content as title when none is set
pub struct ExtractTitleProcessor {
    property: String,
    content_property: String,
}

impl ExtractTitleProcessor {
    pub fn new(property: impl Into<String>, content_property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            content_property: content_property.into(),
        }
    }
}

impl Default for ExtractTitleProcessor {
    fn default() -> Self {
        Self::new("title", "content")
    }
}

impl Processor for ExtractTitleProcessor {
    fn process(&self, data: &mut Mapping, _type_name: &str, _content: &Content) -> Result<()> {
        if data.contains_key(&self.property) {
            return Ok(());
        }

        let Some(Value::String(html)) = data.get(&self.content_property) else {
            return Ok(());
        };

        if let Some(title) = extract_title(html) {
            data.insert(self.property.clone(), title.into());
        }
        Ok(())
    }
}

/// Text of the first `<h1>`, without nested markup
fn extract_title(html: &str) -> Option<String> {
    let heading = HEADING.captures(html)?.get(1)?.as_str();
    let text = TAG.replace_all(heading, "");
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Format;
    use serde_json::json;

    fn process(data: &mut Mapping) {
        let content = Content::new("page", Format::Html, "");
        ExtractTitleProcessor::default()
            .process(data, "page", &content)
            .unwrap();
    }

    #[test]
    fn test_extracts_first_heading() {
        let mut data = Mapping::new();
        data.insert(
            "content".to_string(),
            json!("<p>intro</p><h1 id=\"top\">Hello <em>World</em></h1><h1>Second</h1>"),
        );

        process(&mut data);
        assert_eq!(data["title"], json!("Hello World"));
    }

    #[test]
    fn test_keeps_existing_title() {
        let mut data = Mapping::new();
        data.insert("title".to_string(), json!("Front-matter"));
        data.insert("content".to_string(), json!("<h1>Heading</h1>"));

        process(&mut data);
        assert_eq!(data["title"], json!("Front-matter"));
    }

    #[test]
    fn test_no_heading() {
        let mut data = Mapping::new();
        data.insert("content".to_string(), json!("<h2>Not a title</h2>"));

        process(&mut data);
        assert!(!data.contains_key("title"));
    }
}
