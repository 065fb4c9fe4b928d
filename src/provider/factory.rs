//! Provider factories - build providers from configuration

use super::{ContentProvider, LocalFilesystemProvider};
use crate::config::{ProviderConfig, DEFAULT_PROVIDER};
use crate::error::{ContentError, Result};

/// Builds providers of one kind from their configuration
pub trait ContentProviderFactory {
    fn supports(&self, type_name: &str, config: &ProviderConfig) -> bool;

    fn create(&self, type_name: &str, config: &ProviderConfig) -> Result<Box<dyn ContentProvider>>;
}

/// Factory of the `files` provider kind
pub struct LocalFilesystemProviderFactory;

impl ContentProviderFactory for LocalFilesystemProviderFactory {
    fn supports(&self, _type_name: &str, config: &ProviderConfig) -> bool {
        config.provider == DEFAULT_PROVIDER
    }

    fn create(&self, type_name: &str, config: &ProviderConfig) -> Result<Box<dyn ContentProvider>> {
        let provider = LocalFilesystemProvider::from_config(type_name, config)?;
        Ok(Box::new(provider))
    }
}

/// Dispatches each configuration to the first factory supporting it
#[derive(Default)]
pub struct ProviderFactory {
    factories: Vec<Box<dyn ContentProviderFactory>>,
}

impl ProviderFactory {
    /// Create a dispatcher without any factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher knowing the built-in `files` provider
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(LocalFilesystemProviderFactory);
        factory
    }

    /// Append a factory; earlier registrations take precedence
    pub fn register<F: ContentProviderFactory + 'static>(&mut self, factory: F) {
        self.factories.push(Box::new(factory));
    }

    pub fn supports(&self, type_name: &str, config: &ProviderConfig) -> bool {
        self.factories.iter().any(|f| f.supports(type_name, config))
    }

    pub fn create(&self, type_name: &str, config: &ProviderConfig) -> Result<Box<dyn ContentProvider>> {
        let factory = self
            .factories
            .iter()
            .find(|f| f.supports(type_name, config))
            .ok_or_else(|| ContentError::NoProviderFactory {
                type_name: type_name.to_string(),
                kind: config.provider.clone(),
            })?;

        tracing::debug!(
            "Creating {} provider for type \"{}\"",
            config.provider,
            type_name
        );
        factory.create(type_name, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, Format};
    use crate::provider::ContentIter;

    struct StaticProvider(String);

    impl ContentProvider for StaticProvider {
        fn supports(&self, type_name: &str) -> bool {
            self.0 == type_name
        }

        fn list_contents(&self) -> Result<ContentIter<'_>> {
            Ok(Box::new(std::iter::once(Ok(Content::new(
                "static",
                Format::Json,
                "{}",
            )))))
        }

        fn get_content(&self, _slug: &str) -> Result<Option<Content>> {
            Ok(None)
        }
    }

    struct StaticProviderFactory;

    impl ContentProviderFactory for StaticProviderFactory {
        fn supports(&self, _type_name: &str, config: &ProviderConfig) -> bool {
            config.provider == "static"
        }

        fn create(&self, type_name: &str, _config: &ProviderConfig) -> Result<Box<dyn ContentProvider>> {
            Ok(Box::new(StaticProvider(type_name.to_string())))
        }
    }

    #[test]
    fn test_files_factory() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ProviderFactory::with_defaults();
        let config = ProviderConfig::files(dir.path());

        assert!(factory.supports("article", &config));
        let provider = factory.create("article", &config).unwrap();
        assert!(provider.supports("article"));
        assert!(!provider.supports("author"));
    }

    #[test]
    fn test_dispatch_to_registered_factory() {
        let mut factory = ProviderFactory::with_defaults();
        factory.register(StaticProviderFactory);

        let config = ProviderConfig {
            provider: "static".to_string(),
            ..Default::default()
        };
        let provider = factory.create("page", &config).unwrap();
        assert!(provider.supports("page"));
        assert_eq!(provider.list_contents().unwrap().count(), 1);
    }

    #[test]
    fn test_no_supporting_factory() {
        let factory = ProviderFactory::with_defaults();
        let config = ProviderConfig {
            provider: "remote".to_string(),
            ..Default::default()
        };

        let err = factory.create("page", &config).err().unwrap();
        match err {
            ContentError::NoProviderFactory { type_name, kind } => {
                assert_eq!(type_name, "page");
                assert_eq!(kind, "remote");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_files_factory_requires_path() {
        let factory = ProviderFactory::with_defaults();
        let err = factory
            .create("article", &ProviderConfig::default())
            .err()
            .unwrap();
        assert!(err.is_config_error());
    }
}
