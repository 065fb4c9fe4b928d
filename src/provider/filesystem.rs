//! Local filesystem provider

use chrono::{DateTime, Local};
use glob::Pattern;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{ContentIter, ContentProvider};
use crate::config::ProviderConfig;
use crate::content::{Content, Format};
use crate::error::{ContentError, Result};

/// Serves the files under a directory as contents of one model type
///
/// The slug of a file is its path relative to the root, without extension,
/// with `/` separators: `guides/setup.md` becomes `guides/setup`.
pub struct LocalFilesystemProvider {
    type_name: String,
    path: PathBuf,
    depth: Option<usize>,
    patterns: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl LocalFilesystemProvider {
    /// Serve every file with a known extension under `path`
    pub fn new(type_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let patterns = Format::KNOWN_EXTENSIONS
            .iter()
            .filter_map(|ext| Pattern::new(&format!("*.{}", ext)).ok())
            .collect();

        Self {
            type_name: type_name.into(),
            path: path.into(),
            depth: None,
            patterns,
            excludes: Vec::new(),
        }
    }

    /// Build a provider from its configuration
    pub fn from_config(type_name: &str, config: &ProviderConfig) -> Result<Self> {
        let path = config.path.as_ref().ok_or_else(|| {
            ContentError::InvalidConfig(format!(
                "the files provider of type \"{}\" has no path",
                type_name
            ))
        })?;

        if !config.extra.is_empty() {
            let mut unknown: Vec<&str> = config.extra.keys().map(String::as_str).collect();
            unknown.sort_unstable();
            return Err(ContentError::InvalidConfig(format!(
                "unknown option(s) {} for the files provider of type \"{}\"",
                unknown.join(", "),
                type_name
            )));
        }

        let mut provider = Self::new(type_name, path);
        provider.depth = config.depth;
        if !config.patterns.is_empty() {
            provider = provider.with_patterns(&config.patterns)?;
        }
        provider.with_excludes(&config.excludes)
    }

    /// Only walk `depth` levels below the root (1 = files of the root only)
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Replace the file name patterns
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        self.patterns = compile_patterns(patterns)?;
        Ok(self)
    }

    /// Skip relative paths matching any of these patterns
    pub fn with_excludes<S: AsRef<str>>(mut self, excludes: &[S]) -> Result<Self> {
        self.excludes = compile_patterns(excludes)?;
        Ok(self)
    }

    /// Root directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_included(&self, relative: &Path) -> bool {
        let Some(file_name) = relative.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if !self.patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        let relative = slash_path(relative);
        !self.excludes.iter().any(|p| p.matches(&relative))
    }

    /// Extensions to try for a direct lookup, from `*.ext` patterns
    fn candidate_extensions(&self) -> Vec<String> {
        let extensions: Vec<String> = self
            .patterns
            .iter()
            .filter_map(|p| p.as_str().strip_prefix("*."))
            .filter(|ext| !ext.contains(['*', '?', '[']))
            .map(str::to_string)
            .collect();

        if extensions.is_empty() {
            Format::KNOWN_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        } else {
            extensions
        }
    }

    fn read(&self, path: &Path, relative: &Path) -> Result<Content> {
        let raw = fs::read_to_string(path)?;
        let format = Format::from_path(path).unwrap_or_else(|| Format::Other(String::new()));
        let slug = slash_path(&relative.with_extension(""));

        let mut content = Content::new(slug, format, raw).with_path(path);
        let modified = fs::metadata(path)?.modified().ok();
        if let Some(modified) = modified {
            content = content.with_last_modified(DateTime::<Local>::from(modified));
        }
        Ok(content)
    }
}

impl ContentProvider for LocalFilesystemProvider {
    fn supports(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }

    fn list_contents(&self) -> Result<ContentIter<'_>> {
        if !self.path.is_dir() {
            tracing::debug!(
                "Content directory {:?} of type \"{}\" does not exist",
                self.path,
                self.type_name
            );
            return Ok(Box::new(std::iter::empty()));
        }

        let mut walker = WalkDir::new(&self.path).follow_links(true).min_depth(1);
        if let Some(depth) = self.depth {
            walker = walker.max_depth(depth);
        }

        tracing::debug!("Listing {} contents in {:?}", self.type_name, self.path);

        let entries = walker
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry))
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(e.into())),
                };

                if !entry.file_type().is_file() {
                    return None;
                }

                let path = entry.path();
                let relative = path.strip_prefix(&self.path).ok()?;
                if !self.is_included(relative) {
                    return None;
                }

                Some(self.read(path, relative))
            });

        Ok(Box::new(entries))
    }

    fn get_content(&self, slug: &str) -> Result<Option<Content>> {
        let slug_path = Path::new(slug);
        let mut components = 0;
        for component in slug_path.components() {
            match component {
                Component::Normal(name) if !name.to_string_lossy().starts_with('.') => {
                    components += 1
                }
                _ => return Ok(None),
            }
        }

        if components == 0 || self.depth.is_some_and(|depth| components > depth) {
            return Ok(None);
        }

        for ext in self.candidate_extensions() {
            let relative = PathBuf::from(format!("{}.{}", slug, ext));
            let path = self.path.join(&relative);
            if path.is_file() && self.is_included(&relative) {
                return self.read(&path, &relative).map(Some);
            }
        }

        Ok(None)
    }
}

fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p.as_ref()).map_err(|e| {
                ContentError::InvalidConfig(format!("invalid pattern \"{}\": {}", p.as_ref(), e))
            })
        })
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Path with `/` separators regardless of platform
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guides/advanced")).unwrap();
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();

        fs::write(root.join("hello.md"), "# Hello").unwrap();
        fs::write(root.join("about.yaml"), "title: About").unwrap();
        fs::write(root.join("guides/setup.md"), "# Setup").unwrap();
        fs::write(root.join("guides/advanced/tuning.json"), "{}").unwrap();
        fs::write(root.join("drafts/wip.md"), "# WIP").unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();
        fs::write(root.join(".hidden.md"), "# Hidden").unwrap();
        fs::write(root.join(".git/config.md"), "# Git").unwrap();
        dir
    }

    fn slugs(provider: &LocalFilesystemProvider) -> Vec<String> {
        let mut slugs: Vec<String> = provider
            .list_contents()
            .unwrap()
            .map(|c| c.unwrap().slug().to_string())
            .collect();
        slugs.sort();
        slugs
    }

    #[test]
    fn test_list_contents() {
        let dir = fixture();
        let provider = LocalFilesystemProvider::new("article", dir.path());

        assert!(provider.supports("article"));
        assert!(!provider.supports("author"));
        assert_eq!(
            slugs(&provider),
            vec![
                "about",
                "drafts/wip",
                "guides/advanced/tuning",
                "guides/setup",
                "hello"
            ]
        );
    }

    #[test]
    fn test_content_record() {
        let dir = fixture();
        let provider = LocalFilesystemProvider::new("article", dir.path());

        let content = provider.get_content("guides/setup").unwrap().unwrap();
        assert_eq!(content.slug(), "guides/setup");
        assert_eq!(content.format(), &Format::Markdown);
        assert_eq!(content.raw_content(), "# Setup");
        assert_eq!(content.path(), Some(dir.path().join("guides/setup.md").as_path()));
        assert!(content.last_modified().is_some());
    }

    #[test]
    fn test_depth_patterns_and_excludes() {
        let dir = fixture();
        let config = ProviderConfig {
            depth: Some(2),
            patterns: vec!["*.md".to_string()],
            excludes: vec!["drafts/*".to_string()],
            ..ProviderConfig::files(dir.path())
        };
        let provider = LocalFilesystemProvider::from_config("article", &config).unwrap();

        assert_eq!(slugs(&provider), vec!["guides/setup", "hello"]);
        assert!(provider.get_content("drafts/wip").unwrap().is_none());
        assert!(provider.get_content("about").unwrap().is_none());
    }

    #[test]
    fn test_get_content_misses() {
        let dir = fixture();
        let provider = LocalFilesystemProvider::new("article", dir.path()).with_depth(1);

        assert!(provider.get_content("hello").unwrap().is_some());
        assert!(provider.get_content("missing").unwrap().is_none());
        assert!(provider.get_content("guides/setup").unwrap().is_none());
        assert!(provider.get_content("../hello").unwrap().is_none());
        assert!(provider.get_content(".hidden").unwrap().is_none());
        assert!(provider.get_content("").unwrap().is_none());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalFilesystemProvider::new("article", dir.path().join("missing"));

        assert_eq!(provider.list_contents().unwrap().count(), 0);
        assert!(provider.get_content("hello").unwrap().is_none());
    }

    #[test]
    fn test_invalid_configuration() {
        let err = LocalFilesystemProvider::from_config("article", &ProviderConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ContentError::InvalidConfig(_)));

        let err = LocalFilesystemProvider::new("article", "content")
            .with_patterns(&["[md"])
            .err()
            .unwrap();
        assert!(matches!(err, ContentError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_options_are_rejected() {
        let config = crate::config::ContentConfig::from_yaml(
            "providers:\n  article:\n    path: content\n    pattern: [\"*.md\"]\n",
        )
        .unwrap();
        let (type_name, provider_config) = &config.provider_configs()[0];
        assert!(provider_config.patterns.is_empty());

        let err = LocalFilesystemProvider::from_config(type_name, provider_config)
            .err()
            .unwrap();
        assert!(matches!(err, ContentError::InvalidConfig(ref m) if m.contains("pattern")));
    }
}
