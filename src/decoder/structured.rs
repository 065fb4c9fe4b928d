//! Decoders for whole-document data formats

use serde_json::Value;

use super::frontmatter::{decode_error, into_mapping};
use super::{Decoder, Mapping};
use crate::content::Format;
use crate::error::Result;

/// A YAML document whose top level is a mapping
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn supports(&self, format: &Format) -> bool {
        *format == Format::Yaml
    }

    fn decode(&self, raw: &str, format: &Format) -> Result<Mapping> {
        let value: Value = serde_yaml::from_str(raw).map_err(|e| decode_error(format, e))?;
        into_mapping(value, format)
    }
}

/// A JSON document whose top level is an object
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn supports(&self, format: &Format) -> bool {
        *format == Format::Json
    }

    fn decode(&self, raw: &str, format: &Format) -> Result<Mapping> {
        let value: Value = serde_json::from_str(raw).map_err(|e| decode_error(format, e))?;
        into_mapping(value, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use serde_json::json;

    #[test]
    fn test_yaml_nested_values() {
        let raw = r#"
name: Ada
address:
  city: London
languages:
  - name: English
    level: 5
active: true
"#;
        let data = YamlDecoder.decode(raw, &Format::Yaml).unwrap();
        assert_eq!(data["address"]["city"], json!("London"));
        assert_eq!(data["languages"][0]["level"], json!(5));
        assert_eq!(data["active"], json!(true));
    }

    #[test]
    fn test_yaml_empty_document() {
        let data = YamlDecoder.decode("", &Format::Yaml).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_yaml_sequence_is_rejected() {
        let err = YamlDecoder.decode("- a\n- b\n", &Format::Yaml).unwrap_err();
        match err {
            ContentError::Decode { format, message } => {
                assert_eq!(format, "yaml");
                assert!(message.contains("sequence"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_malformed() {
        let err = JsonDecoder.decode("{\"a\": ", &Format::Json).unwrap_err();
        assert!(matches!(err, ContentError::Decode { .. }));
    }
}
