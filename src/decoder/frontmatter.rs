//! Front-matter splitting

use serde_json::Value;

use super::Mapping;
use crate::content::Format;
use crate::error::{ContentError, Result};

/// Split front-matter from a document body
///
/// Returns the front-matter as a mapping (empty when there is none) and the
/// remaining body. Both `---` delimited YAML and `;;;` delimited or bare
/// JSON objects are recognized.
pub fn split_front_matter<'a>(content: &'a str, format: &Format) -> Result<(Mapping, &'a str)> {
    let content = content.trim_start();

    if content.starts_with("---") {
        return parse_yaml(content, format);
    }

    if content.starts_with(";;;") || content.starts_with('{') {
        return parse_json(content, format);
    }

    Ok((Mapping::new(), content))
}

fn parse_yaml<'a>(content: &'a str, format: &Format) -> Result<(Mapping, &'a str)> {
    let rest = content[3..].trim_start_matches(['\n', '\r']);

    let Some(end_pos) = rest.find("\n---") else {
        // No closing delimiter, the whole document is body
        return Ok((Mapping::new(), content));
    };

    let yaml_content = &rest[..end_pos];
    let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

    if yaml_content.trim().is_empty() {
        return Ok((Mapping::new(), remaining));
    }

    // A `---` horizontal rule followed by prose is not front-matter
    if !has_yaml_structure(yaml_content) {
        tracing::warn!("Leading --- block has no key: value line, keeping it as body");
        return Ok((Mapping::new(), content));
    }

    let value: Value = serde_yaml::from_str(yaml_content).map_err(|e| decode_error(format, e))?;
    Ok((into_mapping(value, format)?, remaining))
}

/// Whether a block has at least one `key: value` line
fn has_yaml_structure(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }

        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };

        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");

        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

fn parse_json<'a>(content: &'a str, format: &Format) -> Result<(Mapping, &'a str)> {
    if let Some(rest) = content.strip_prefix(";;;") {
        if let Some(end_pos) = rest.find(";;;") {
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

            // The `;;;` form omits the outer braces
            let value: Value = serde_json::from_str(&format!("{{{}}}", json_content))
                .or_else(|_| serde_json::from_str(json_content))
                .map_err(|e| decode_error(format, e))?;

            return Ok((into_mapping(value, format)?, remaining));
        }
    }

    if content.starts_with('{') {
        let end_pos = matching_brace(content);

        if let Some(end_pos) = end_pos {
            let json_content = &content[..end_pos];
            let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);

            let value: Value =
                serde_json::from_str(json_content).map_err(|e| decode_error(format, e))?;

            return Ok((into_mapping(value, format)?, remaining));
        }
    }

    Err(ContentError::Decode {
        format: format.to_string(),
        message: "unterminated JSON front-matter".to_string(),
    })
}

/// Byte offset just past the brace closing the leading `{`
fn matching_brace(content: &str) -> Option<usize> {
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

pub(super) fn into_mapping(value: Value, format: &Format) -> Result<Mapping> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(ContentError::Decode {
            format: format.to_string(),
            message: format!("expected a mapping at the top level, found {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

pub(super) fn decode_error(format: &Format, e: impl std::fmt::Display) -> ContentError {
    ContentError::Decode {
        format: format.to_string(),
        message: e.to_string(),
    }
}
