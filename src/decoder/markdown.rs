//! Markdown to HTML, with syntax highlighted code blocks

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::error::{ContentError, Result};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Renders Markdown bodies to HTML
///
/// Code blocks become `<pre><code>` elements, one `<span class="line">` per
/// source line, colored with the configured syntect theme.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Highlight with the default theme and number the lines
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            theme: ThemeSet::load_defaults().themes.remove(DEFAULT_THEME),
            line_numbers: true,
        }
    }

    /// Highlight with one of syntect's bundled themes
    ///
    /// An unknown theme name is a configuration error.
    pub fn with_options(theme: &str, line_numbers: bool) -> Result<Self> {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes.remove(theme).ok_or_else(|| {
            let known: Vec<&str> = themes.keys().map(String::as_str).collect();
            ContentError::InvalidConfig(format!(
                "unknown highlight theme \"{}\", expected one of: {}",
                theme,
                known.join(", ")
            ))
        })?;

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            theme: Some(theme),
            line_numbers,
        })
    }

    /// Render a Markdown body to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is split off before rendering, no metadata blocks here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;

        let mut events = Vec::new();
        let mut in_code_block = false;
        let mut language: Option<String> = None;
        let mut code = String::new();

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    language = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let block = self.code_block(&code, language.take().as_deref());
                    events.push(Event::Html(CowStr::from(block)));
                }
                Event::Text(text) if in_code_block => code.push_str(&text),
                event => events.push(event),
            }
        }

        let mut output = String::new();
        html::push_html(&mut output, events.into_iter());
        output
    }

    fn code_block(&self, code: &str, language: Option<&str>) -> String {
        let class = language
            .map(|lang| format!(r#" class="language-{}""#, html_escape(lang)))
            .unwrap_or_default();

        let syntax = language
            .and_then(|lang| self.syntax_set.find_syntax_by_token(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let (style, lines) = match &self.theme {
            Some(theme) => match self.highlight_lines(code, syntax, theme) {
                Ok(lines) => (background_style(theme), lines),
                Err(e) => {
                    tracing::warn!("Failed to highlight {} code block: {}", syntax.name, e);
                    (String::new(), code.lines().map(html_escape).collect())
                }
            },
            None => (String::new(), code.lines().map(html_escape).collect()),
        };

        let body: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.line(i + 1, line))
            .collect();

        format!("<pre{}><code{}>{}</code></pre>\n", style, class, body.join("\n"))
    }

    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> std::result::Result<Vec<String>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        code.lines()
            .map(|line| {
                let regions = highlighter.highlight_line(line, &self.syntax_set)?;
                styled_line_to_highlighted_html(&regions, IncludeBackground::No)
            })
            .collect()
    }

    fn line(&self, number: usize, html: &str) -> String {
        if self.line_numbers {
            format!(
                r#"<span class="line"><span class="line-number">{}</span>{}</span>"#,
                number, html
            )
        } else {
            format!(r#"<span class="line">{}</span>"#, html)
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fence info string, `rust` in "```rust,ignore"
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

fn background_style(theme: &Theme) -> String {
    theme
        .settings
        .background
        .map(|c| format!(r#" style="background-color:#{:02x}{:02x}{:02x}""#, c.r, c.g, c.b))
        .unwrap_or_default()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let html = MarkdownRenderer::new().render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_highlighted_code_block() {
        let html = MarkdownRenderer::new().render("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains(r#"<pre style="background-color:#"#));
        assert!(html.contains(r#"<span class="line-number">1</span>"#));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_fence_without_language_stays_in_pre() {
        let html = MarkdownRenderer::new().render("```\nlet x = 1;\n```\n");
        let pre = html.find("<pre").unwrap();
        let code = html.find("let x = 1;").unwrap();
        assert!(pre < code);
        assert!(!html.contains("<p>"));
        assert!(!html.contains("class=\"language-"));
    }

    #[test]
    fn test_indented_code_block_stays_in_pre() {
        let html = MarkdownRenderer::new().render("Intro\n\n    let y = 2;\n    let z = 3;\n");
        assert!(html.contains("<p>Intro</p>"));
        let pre = html.find("<pre").unwrap();
        assert!(pre < html.find("let y = 2;").unwrap());
        assert!(pre < html.find("let z = 3;").unwrap());
        assert_eq!(html.matches(r#"<span class="line">"#).count(), 2);
    }

    #[test]
    fn test_fence_language_is_escaped() {
        let html = MarkdownRenderer::new().render("```\"><script>alert(1)</script>\nx\n```\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"class="language-&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;""#));
    }

    #[test]
    fn test_fence_info_keeps_first_word() {
        assert_eq!(fence_language("rust,ignore"), Some("rust".to_string()));
        assert_eq!(fence_language("python title=a.py"), Some("python".to_string()));
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_render_without_line_numbers() {
        let renderer = MarkdownRenderer::with_options("InspiredGitHub", false).unwrap();
        let html = renderer.render("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"<code class="language-rust"><span class="line">"#));
        assert!(!html.contains("line-number"));
    }

    #[test]
    fn test_unknown_theme_is_a_config_error() {
        let err = MarkdownRenderer::with_options("no-such-theme", true)
            .err()
            .unwrap();
        assert!(matches!(err, ContentError::InvalidConfig(ref m) if m.contains("no-such-theme")));
    }
}
