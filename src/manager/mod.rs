//! Content manager - loads, caches and queries typed contents
//!
//! Every record goes through the same pipeline: decode, process,
//! denormalize, cache. The cache is keyed by (type name, slug) and lives as
//! long as the manager, so each item is loaded at most once and repeated
//! lookups return the same `Rc`.

mod builder;

pub use builder::ContentManagerBuilder;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::content::Content;
use crate::decoder::DecoderRegistry;
use crate::denormalizer::{DenormalizeContext, Denormalizer};
use crate::error::{ContentError, Result};
use crate::model::{Instance, Model};
use crate::processor::Processor;
use crate::provider::ContentProvider;
use crate::query::{Filter, Sort};

type CacheKey = (String, String);

/// Entry point to typed contents
///
/// Built with [`ContentManagerBuilder`], handed out as `Rc` so that
/// processors can hold a weak handle on it. Not thread-safe: build one
/// manager per thread.
pub struct ContentManager {
    providers: Vec<Box<dyn ContentProvider>>,
    decoders: DecoderRegistry,
    processors: Vec<Box<dyn Processor>>,
    denormalizers: Vec<Box<dyn Denormalizer>>,
    cache: RefCell<HashMap<CacheKey, Rc<dyn Instance>>>,
    loading: RefCell<HashSet<CacheKey>>,
}

impl ContentManager {
    fn new(
        providers: Vec<Box<dyn ContentProvider>>,
        decoders: DecoderRegistry,
        processors: Vec<Box<dyn Processor>>,
        denormalizers: Vec<Box<dyn Denormalizer>>,
    ) -> Self {
        Self {
            providers,
            decoders,
            processors,
            denormalizers,
            cache: RefCell::new(HashMap::new()),
            loading: RefCell::new(HashSet::new()),
        }
    }

    pub fn builder() -> ContentManagerBuilder {
        ContentManagerBuilder::new()
    }

    /// Whether any provider serves contents of `T`
    pub fn supports<T: Model>(&self) -> bool {
        self.supports_type(T::TYPE)
    }

    pub fn supports_type(&self, type_name: &str) -> bool {
        self.providers.iter().any(|p| p.supports(type_name))
    }

    /// List the contents of `T`, filtered then sorted
    ///
    /// ```ignore
    /// let featured = manager.get_contents::<Article>(
    ///     Sort::by([("date", false), ("title", true)]),
    ///     Filter::from("featured"),
    /// )?;
    /// ```
    pub fn get_contents<T: Model>(&self, sort: Sort<T>, filter: Filter<T>) -> Result<Vec<Rc<T>>> {
        let items = self
            .get_instances(T::TYPE)?
            .into_iter()
            .map(downcast::<T>)
            .collect::<Result<Vec<_>>>()?;

        let items = filter.apply(items).map_err(|source| ContentError::Filter {
            type_name: T::TYPE.to_string(),
            source,
        })?;

        sort.apply(items).map_err(|source| ContentError::Sort {
            type_name: T::TYPE.to_string(),
            source,
        })
    }

    /// List every content of `T`, in listing order
    pub fn all_contents<T: Model>(&self) -> Result<Vec<Rc<T>>> {
        self.get_contents(Sort::None, Filter::None)
    }

    /// Fetch one content of `T` by slug
    pub fn get_content<T: Model>(&self, id: &str) -> Result<Rc<T>> {
        self.get_instance(T::TYPE, id).and_then(downcast::<T>)
    }

    /// Fetch one content by type name and slug, without static typing
    pub fn get_instance(&self, type_name: &str, id: &str) -> Result<Rc<dyn Instance>> {
        if let Some(instance) = self.cached(type_name, id) {
            tracing::debug!("Cache hit for {} \"{}\"", type_name, id);
            return Ok(instance);
        }

        for provider in self.providers_for(type_name)? {
            if let Some(content) = provider.get_content(id)? {
                return self.load(type_name, content);
            }
        }

        Err(ContentError::NotFound {
            type_name: type_name.to_string(),
            id: id.to_string(),
        })
    }

    /// List every content of a type, without static typing
    ///
    /// When several providers serve the same slug, the first one wins.
    pub fn get_instances(&self, type_name: &str) -> Result<Vec<Rc<dyn Instance>>> {
        let mut seen = HashSet::new();
        let mut instances = Vec::new();

        for provider in self.providers_for(type_name)? {
            for content in provider.list_contents()? {
                let content = content?;
                if !seen.insert(content.slug().to_string()) {
                    tracing::debug!(
                        "Skipping duplicate {} \"{}\" from a later provider",
                        type_name,
                        content.slug()
                    );
                    continue;
                }
                instances.push(self.load(type_name, content)?);
            }
        }

        tracing::debug!("Listed {} {} content(s)", instances.len(), type_name);
        Ok(instances)
    }

    /// Whether the content has already been loaded
    pub fn is_cached(&self, type_name: &str, slug: &str) -> bool {
        self.cached(type_name, slug).is_some()
    }

    fn cached(&self, type_name: &str, slug: &str) -> Option<Rc<dyn Instance>> {
        let key = (type_name.to_string(), slug.to_string());
        self.cache.borrow().get(&key).cloned()
    }

    fn providers_for(&self, type_name: &str) -> Result<Vec<&dyn ContentProvider>> {
        if self.providers.is_empty() {
            return Err(ContentError::NoProviders);
        }

        let providers: Vec<&dyn ContentProvider> = self
            .providers
            .iter()
            .filter(|p| p.supports(type_name))
            .map(|p| p.as_ref())
            .collect();

        if providers.is_empty() {
            return Err(ContentError::UnsupportedType(type_name.to_string()));
        }
        Ok(providers)
    }

    /// Load a record, going through the cache
    fn load(&self, type_name: &str, content: Content) -> Result<Rc<dyn Instance>> {
        if let Some(instance) = self.cached(type_name, content.slug()) {
            tracing::debug!("Cache hit for {} \"{}\"", type_name, content.slug());
            return Ok(instance);
        }

        // Processors may load other contents through the manager, so no
        // RefCell borrow is held across the pipeline.
        let key = (type_name.to_string(), content.slug().to_string());
        if !self.loading.borrow_mut().insert(key.clone()) {
            return Err(ContentError::CircularReference {
                type_name: key.0,
                slug: key.1,
            });
        }

        let result = self.run_pipeline(type_name, &content);
        self.loading.borrow_mut().remove(&key);

        let instance = result?;
        self.cache.borrow_mut().insert(key, Rc::clone(&instance));
        Ok(instance)
    }

    fn run_pipeline(&self, type_name: &str, content: &Content) -> Result<Rc<dyn Instance>> {
        tracing::debug!(
            "Loading {} \"{}\" ({})",
            type_name,
            content.slug(),
            content.format()
        );

        let mut data = self
            .decoders
            .decode(content.raw_content(), content.format())?;

        for processor in &self.processors {
            processor.process(&mut data, type_name, content)?;
        }

        let denormalizer = self
            .denormalizers
            .iter()
            .find(|d| d.supports(type_name))
            .ok_or_else(|| ContentError::NoDenormalizer(type_name.to_string()))?;

        let context = DenormalizeContext {
            format: content.format(),
            slug: content.slug(),
            skip_instantiated: true,
        };
        let instance = denormalizer.denormalize(data, type_name, &context)?;
        Ok(Rc::from(instance))
    }
}

fn downcast<T: Model>(instance: Rc<dyn Instance>) -> Result<Rc<T>> {
    instance
        .into_any()
        .downcast::<T>()
        .map_err(|_| ContentError::TypeMismatch(T::TYPE.to_string()))
}
