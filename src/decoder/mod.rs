//! Decoders - turn raw content into a structured mapping
//!
//! A decoder claims one or more [`Format`]s. The [`DecoderRegistry`] keeps
//! them in registration order and dispatches each call to the first decoder
//! supporting the requested format.

mod frontmatter;
mod markdown;
mod structured;

pub use frontmatter::split_front_matter;
pub use markdown::MarkdownRenderer;
pub use structured::{JsonDecoder, YamlDecoder};

use crate::content::Format;
use crate::error::{ContentError, Result};

/// Decoded content: string keys to heterogeneous values
pub type Mapping = serde_json::Map<String, serde_json::Value>;

/// Converts raw text in a given format into a [`Mapping`]
pub trait Decoder {
    fn supports(&self, format: &Format) -> bool;

    fn decode(&self, raw: &str, format: &Format) -> Result<Mapping>;
}

/// Ordered list of decoders, first supporting decoder wins
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn Decoder>>,
}

impl DecoderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in Markdown, HTML, YAML and JSON decoders
    pub fn with_defaults() -> Self {
        Self::with_renderer(MarkdownRenderer::new())
    }

    /// Same as [`DecoderRegistry::with_defaults`], rendering Markdown with `renderer`
    pub fn with_renderer(renderer: MarkdownRenderer) -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownDecoder::with_renderer(renderer));
        registry.register(HtmlDecoder);
        registry.register(YamlDecoder);
        registry.register(JsonDecoder);
        registry
    }

    /// Append a decoder; earlier registrations take precedence
    pub fn register<D: Decoder + 'static>(&mut self, decoder: D) {
        self.decoders.push(Box::new(decoder));
    }

    /// Decode with the first decoder supporting `format`
    pub fn decode(&self, raw: &str, format: &Format) -> Result<Mapping> {
        let decoder = self
            .decoders
            .iter()
            .find(|d| d.supports(format))
            .ok_or_else(|| ContentError::UnsupportedFormat(format.to_string()))?;

        decoder.decode(raw, format)
    }
}

/// Marks the end of the excerpt in a Markdown body
const EXCERPT_MARKER: &str = "<!-- more -->";

/// Markdown with optional front-matter; the body is rendered to HTML
///
/// The rendered body lands in `content`. When the body holds an
/// `<!-- more -->` marker, the text before it is rendered into `excerpt`
/// unless the front-matter already sets one, and the marker itself is
/// dropped from `content`.
pub struct MarkdownDecoder {
    renderer: MarkdownRenderer,
}

impl MarkdownDecoder {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Use a custom renderer (highlight theme, line numbers)
    pub fn with_renderer(renderer: MarkdownRenderer) -> Self {
        Self { renderer }
    }
}

impl Default for MarkdownDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for MarkdownDecoder {
    fn supports(&self, format: &Format) -> bool {
        *format == Format::Markdown
    }

    fn decode(&self, raw: &str, format: &Format) -> Result<Mapping> {
        let (mut data, body) = split_front_matter(raw, format)?;

        let html = match body.split_once(EXCERPT_MARKER) {
            Some((excerpt, rest)) => {
                if !data.contains_key("excerpt") {
                    let excerpt = self.renderer.render(excerpt.trim());
                    data.insert("excerpt".to_string(), excerpt.into());
                }
                self.renderer
                    .render(&format!("{}\n\n{}", excerpt.trim_end(), rest.trim_start()))
            }
            None => self.renderer.render(body),
        };
        data.insert("content".to_string(), html.into());

        Ok(data)
    }
}

/// HTML with optional front-matter; the body is kept verbatim
pub struct HtmlDecoder;

impl Decoder for HtmlDecoder {
    fn supports(&self, format: &Format) -> bool {
        *format == Format::Html
    }

    fn decode(&self, raw: &str, format: &Format) -> Result<Mapping> {
        let (mut data, body) = split_front_matter(raw, format)?;
        data.insert("content".to_string(), body.trim().to_string().into());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_dispatches_by_format() {
        let registry = DecoderRegistry::with_defaults();

        let data = registry
            .decode("title: Hello\ntags: [a, b]\n", &Format::Yaml)
            .unwrap();
        assert_eq!(data["title"], json!("Hello"));
        assert_eq!(data["tags"], json!(["a", "b"]));

        let data = registry.decode(r#"{"title": "Hi"}"#, &Format::Json).unwrap();
        assert_eq!(data["title"], json!("Hi"));
    }

    #[test]
    fn test_registry_unsupported_format() {
        let registry = DecoderRegistry::with_defaults();
        let err = registry
            .decode("a = 1", &Format::Other("toml".to_string()))
            .unwrap_err();
        assert!(matches!(err, ContentError::UnsupportedFormat(f) if f == "toml"));
    }

    #[test]
    fn test_first_registered_decoder_wins() {
        struct Constant;

        impl Decoder for Constant {
            fn supports(&self, _format: &Format) -> bool {
                true
            }

            fn decode(&self, _raw: &str, _format: &Format) -> Result<Mapping> {
                let mut data = Mapping::new();
                data.insert("constant".to_string(), json!(true));
                Ok(data)
            }
        }

        let mut registry = DecoderRegistry::new();
        registry.register(Constant);
        registry.register(JsonDecoder);

        let data = registry.decode(r#"{"a": 1}"#, &Format::Json).unwrap();
        assert_eq!(data.get("constant"), Some(&json!(true)));
        assert!(data.get("a").is_none());
    }

    #[test]
    fn test_markdown_decoder() {
        let content = r#"---
title: Hello World
tags:
  - rust
---

Intro paragraph.
<!-- more -->
# Details
"#;

        let data = MarkdownDecoder::new()
            .decode(content, &Format::Markdown)
            .unwrap();
        assert_eq!(data["title"], json!("Hello World"));
        assert_eq!(data["tags"], json!(["rust"]));

        let html = data["content"].as_str().unwrap();
        assert!(html.contains("<p>Intro paragraph.</p>"));
        assert!(html.contains("<h1>Details</h1>"));

        assert!(!html.contains("more"));

        let excerpt = data["excerpt"].as_str().unwrap();
        assert!(excerpt.contains("Intro paragraph."));
        assert!(!excerpt.contains("Details"));
    }

    #[test]
    fn test_markdown_excerpt_from_front_matter_wins() {
        let content = "---\nexcerpt: Hand written\n---\nFirst.\n<!-- more -->\nSecond.\n";
        let data = MarkdownDecoder::new()
            .decode(content, &Format::Markdown)
            .unwrap();
        assert_eq!(data["excerpt"], json!("Hand written"));
        assert!(data["content"].as_str().unwrap().contains("<p>Second.</p>"));
    }

    #[test]
    fn test_markdown_without_excerpt_marker() {
        let data = MarkdownDecoder::new()
            .decode("Just a body.\n", &Format::Markdown)
            .unwrap();
        assert!(data.get("excerpt").is_none());
        assert_eq!(data["content"], json!("<p>Just a body.</p>\n"));
    }

    #[test]
    fn test_markdown_code_block_in_content() {
        let data = MarkdownDecoder::new()
            .decode("---\ntitle: Code\n---\n```\nlet x = 1;\n```\n", &Format::Markdown)
            .unwrap();
        let html = data["content"].as_str().unwrap();
        assert!(html.starts_with("<pre"));
        assert!(html.find("<pre").unwrap() < html.find("let x = 1;").unwrap());
    }

    #[test]
    fn test_html_decoder_keeps_body() {
        let content = "---\ntitle: Page\n---\n<h1>Page</h1>\n<p>Body</p>\n";
        let data = HtmlDecoder.decode(content, &Format::Html).unwrap();
        assert_eq!(data["title"], json!("Page"));
        assert_eq!(data["content"], json!("<h1>Page</h1>\n<p>Body</p>"));
    }
}
