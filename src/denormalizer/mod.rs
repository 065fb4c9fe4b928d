//! Denormalizers - turn a processed mapping into a typed instance

use serde_json::Value;
use std::marker::PhantomData;

use crate::content::Format;
use crate::decoder::Mapping;
use crate::error::{ContentError, Result};
use crate::model::{Instance, Model};

/// Options passed along with every denormalization
#[derive(Debug, Clone, Copy)]
pub struct DenormalizeContext<'a> {
    /// Format the mapping was decoded from
    pub format: &'a Format,
    /// Slug of the item being denormalized
    pub slug: &'a str,
    /// Leave values that processors already resolved into objects untouched
    pub skip_instantiated: bool,
}

/// Converts a mapping into an instance of a model type
pub trait Denormalizer {
    fn supports(&self, type_name: &str) -> bool;

    fn denormalize(
        &self,
        data: Mapping,
        type_name: &str,
        context: &DenormalizeContext<'_>,
    ) -> Result<Box<dyn Instance>>;
}

/// Deserializes the mapping into `T` through serde
///
/// Nested values resolved by processors are already plain data, so they
/// deserialize as they are whatever `skip_instantiated` says.
pub struct SerdeDenormalizer<T> {
    _model: PhantomData<fn() -> T>,
}

impl<T: Model> SerdeDenormalizer<T> {
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<T: Model> Default for SerdeDenormalizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> Denormalizer for SerdeDenormalizer<T> {
    fn supports(&self, type_name: &str) -> bool {
        type_name == T::TYPE
    }

    fn denormalize(
        &self,
        data: Mapping,
        type_name: &str,
        context: &DenormalizeContext<'_>,
    ) -> Result<Box<dyn Instance>> {
        let item: T = serde_json::from_value(Value::Object(data)).map_err(|source| {
            ContentError::Denormalize {
                type_name: type_name.to_string(),
                slug: context.slug.to_string(),
                source,
            }
        })?;

        let instance: Box<dyn Instance> = Box::new(item);
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::rc::Rc;

    #[derive(Debug, Serialize, Deserialize)]
    struct Author {
        name: String,
        #[serde(default)]
        age: Option<u32>,
    }

    impl Model for Author {
        const TYPE: &'static str = "author";
    }

    fn context(format: &Format) -> DenormalizeContext<'_> {
        DenormalizeContext {
            format,
            slug: "ada",
            skip_instantiated: true,
        }
    }

    #[test]
    fn test_serde_denormalizer() {
        let denormalizer = SerdeDenormalizer::<Author>::new();
        assert!(denormalizer.supports("author"));
        assert!(!denormalizer.supports("article"));

        let data = json!({"name": "Ada", "age": 36, "unused": true});
        let Value::Object(data) = data else {
            unreachable!()
        };

        let instance = denormalizer
            .denormalize(data, "author", &context(&Format::Yaml))
            .unwrap();
        let author = Rc::<dyn Instance>::from(instance)
            .into_any()
            .downcast::<Author>()
            .unwrap();
        assert_eq!(author.name, "Ada");
        assert_eq!(author.age, Some(36));
    }

    #[test]
    fn test_serde_denormalizer_reports_slug() {
        let denormalizer = SerdeDenormalizer::<Author>::new();
        let err = denormalizer
            .denormalize(Mapping::new(), "author", &context(&Format::Yaml))
            .err()
            .unwrap();

        match err {
            ContentError::Denormalize {
                type_name, slug, ..
            } => {
                assert_eq!(type_name, "author");
                assert_eq!(slug, "ada");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
