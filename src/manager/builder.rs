//! Content manager construction

use std::rc::{Rc, Weak};

use super::ContentManager;
use crate::config::ContentConfig;
use crate::decoder::{Decoder, DecoderRegistry, MarkdownRenderer};
use crate::denormalizer::{Denormalizer, SerdeDenormalizer};
use crate::error::Result;
use crate::model::Model;
use crate::processor::{default_processors, Processor};
use crate::provider::{ContentProvider, ContentProviderFactory, ProviderFactory};

/// Collects the collaborators of a [`ContentManager`]
///
/// Registration order matters everywhere: providers are queried in order,
/// processors run in order, and the first decoder or denormalizer supporting
/// a format or type wins.
pub struct ContentManagerBuilder {
    providers: Vec<Box<dyn ContentProvider>>,
    decoders: DecoderRegistry,
    processors: Vec<Box<dyn Processor>>,
    denormalizers: Vec<Box<dyn Denormalizer>>,
    factory: ProviderFactory,
}

impl ContentManagerBuilder {
    /// Start without decoders, processors, denormalizers or providers
    ///
    /// The provider factory knows the built-in `files` kind.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            decoders: DecoderRegistry::new(),
            processors: Vec::new(),
            denormalizers: Vec::new(),
            factory: ProviderFactory::with_defaults(),
        }
    }

    /// Start with the built-in decoders and processors
    pub fn with_defaults() -> Self {
        Self {
            decoders: DecoderRegistry::with_defaults(),
            processors: default_processors(),
            ..Self::new()
        }
    }

    /// Start with the built-in decoders and processors, then register the
    /// providers declared in `config`
    pub fn from_config(config: &ContentConfig) -> Result<Self> {
        let renderer =
            MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.line_number)?;
        let builder = Self {
            decoders: DecoderRegistry::with_renderer(renderer),
            ..Self::with_defaults()
        };
        builder.with_config(config)
    }

    pub fn provider<P: ContentProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn decoder<D: Decoder + 'static>(mut self, decoder: D) -> Self {
        self.decoders.register(decoder);
        self
    }

    pub fn processor<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn denormalizer<D: Denormalizer + 'static>(mut self, denormalizer: D) -> Self {
        self.denormalizers.push(Box::new(denormalizer));
        self
    }

    /// Register the serde denormalizer of a model type
    pub fn model<T: Model>(self) -> Self {
        self.denormalizer(SerdeDenormalizer::<T>::new())
    }

    /// Teach the provider factory a new provider kind
    ///
    /// Call before [`ContentManagerBuilder::with_config`] for the kind to be
    /// usable in configuration.
    pub fn factory<F: ContentProviderFactory + 'static>(mut self, factory: F) -> Self {
        self.factory.register(factory);
        self
    }

    /// Register the providers declared in `config` through the provider factory
    pub fn with_config(mut self, config: &ContentConfig) -> Result<Self> {
        for (type_name, provider_config) in config.provider_configs() {
            let provider = self.factory.create(&type_name, &provider_config)?;
            tracing::info!(
                "Registered {} provider for type \"{}\"",
                provider_config.provider,
                type_name
            );
            self.providers.push(provider);
        }
        Ok(self)
    }

    /// Build the manager and attach it to every processor
    pub fn build(self) -> Rc<ContentManager> {
        let Self {
            providers,
            decoders,
            mut processors,
            denormalizers,
            ..
        } = self;

        tracing::debug!(
            "Building content manager with {} provider(s) and {} processor(s)",
            providers.len(),
            processors.len()
        );

        Rc::new_cyclic(|manager: &Weak<ContentManager>| {
            for processor in processors.iter_mut() {
                processor.attach(manager.clone());
            }

            ContentManager::new(providers, decoders, processors, denormalizers)
        })
    }
}

impl Default for ContentManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
