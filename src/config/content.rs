//! Content configuration (content.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Provider kind used when a source does not name one
pub const DEFAULT_PROVIDER: &str = "files";

/// Main content configuration
///
/// ```yaml
/// providers:
///   article: content/articles
///   author:
///     path: content/authors
///     patterns: ["*.yaml"]
///   page:
///     - content/pages
///     - provider: files
///       path: legacy/pages
///       excludes: ["drafts/*"]
/// highlight:
///   theme: base16-ocean.dark
///   line_number: false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Sources per model type name, in declaration order
    pub providers: IndexMap<String, ProviderSources>,

    /// Code highlighting of rendered Markdown
    pub highlight: HighlightConfig,
}

impl ContentConfig {
    /// Load configuration from a file
    ///
    /// Relative provider paths are resolved against the directory holding
    /// the configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }

        tracing::debug!("Loaded content configuration from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Make relative provider paths relative to `base_dir`
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for sources in self.providers.values_mut() {
            for source in sources.iter_mut() {
                let path = match source {
                    ProviderSource::Path(path) => Some(path),
                    ProviderSource::Config(config) => config.path.as_mut(),
                };

                if let Some(path) = path.filter(|p| p.is_relative()) {
                    *path = base_dir.join(&*path);
                }
            }
        }
    }

    /// Every declared provider as a (type name, provider configuration) pair
    pub fn provider_configs(&self) -> Vec<(String, ProviderConfig)> {
        self.providers
            .iter()
            .flat_map(|(type_name, sources)| {
                sources
                    .iter()
                    .map(move |source| (type_name.clone(), source.to_config()))
            })
            .collect()
    }
}

/// One or several sources for a model type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderSources {
    One(ProviderSource),
    Many(Vec<ProviderSource>),
}

impl ProviderSources {
    pub fn iter(&self) -> std::slice::Iter<'_, ProviderSource> {
        match self {
            ProviderSources::One(source) => std::slice::from_ref(source).iter(),
            ProviderSources::Many(sources) => sources.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ProviderSource> {
        match self {
            ProviderSources::One(source) => std::slice::from_mut(source).iter_mut(),
            ProviderSources::Many(sources) => sources.iter_mut(),
        }
    }
}

/// A directory path shorthand or a full provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderSource {
    Path(PathBuf),
    Config(ProviderConfig),
}

impl ProviderSource {
    /// Expand the path shorthand into a `files` provider configuration
    pub fn to_config(&self) -> ProviderConfig {
        match self {
            ProviderSource::Path(path) => ProviderConfig {
                path: Some(path.clone()),
                ..Default::default()
            },
            ProviderSource::Config(config) => config.clone(),
        }
    }
}

/// Configuration of one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider kind, used to pick the factory
    pub provider: String,

    /// Root directory of a `files` provider
    pub path: Option<PathBuf>,

    /// Maximum directory depth to walk, unlimited when absent
    pub depth: Option<usize>,

    /// Glob patterns file names must match
    pub patterns: Vec<String>,

    /// Glob patterns of relative paths to skip
    pub excludes: Vec<String>,

    /// Options for custom provider kinds
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            path: None,
            depth: None,
            patterns: Vec::new(),
            excludes: Vec::new(),
            extra: HashMap::new(),
        }
    }
}

impl ProviderConfig {
    /// Configuration of a `files` provider rooted at `path`
    pub fn files(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContentConfig::default();
        assert!(config.providers.is_empty());
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(config.highlight.line_number);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
providers:
  article: content/articles
  author:
    path: content/authors
    patterns: ["*.yaml"]
    depth: 1
  page:
    - content/pages
    - provider: remote
      url: https://example.com/pages
highlight:
  line_number: false
"#;
        let config = ContentConfig::from_yaml(yaml).unwrap();
        assert!(!config.highlight.line_number);

        let providers = config.provider_configs();
        assert_eq!(providers.len(), 4);

        let (type_name, article) = &providers[0];
        assert_eq!(type_name, "article");
        assert_eq!(article, &ProviderConfig::files("content/articles"));

        let (_, author) = &providers[1];
        assert_eq!(author.provider, "files");
        assert_eq!(author.depth, Some(1));
        assert_eq!(author.patterns, vec!["*.yaml"]);

        let (type_name, remote) = &providers[3];
        assert_eq!(type_name, "page");
        assert_eq!(remote.provider, "remote");
        assert_eq!(remote.path, None);
        assert_eq!(
            remote.extra.get("url"),
            Some(&serde_yaml::Value::from("https://example.com/pages"))
        );
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("content.yml");
        fs::write(
            &config_path,
            "providers:\n  article: articles\n  author:\n    path: /abs/authors\n",
        )
        .unwrap();

        let config = ContentConfig::load(&config_path).unwrap();
        let providers = config.provider_configs();
        assert_eq!(providers[0].1.path, Some(dir.path().join("articles")));
        assert_eq!(providers[1].1.path, Some(PathBuf::from("/abs/authors")));
    }
}
