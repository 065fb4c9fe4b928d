//! Content filters

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use super::property::{is_truthy, loose_eq, normalize, resolve};
use crate::error::{ContentError, Result};

/// Predicate callback used by [`Filter::Predicate`]
pub type Predicate<T> = Box<dyn Fn(&T) -> anyhow::Result<bool>>;

/// Which items of a listing to keep
pub enum Filter<T> {
    /// Keep everything
    None,
    /// Keep items whose property is truthy, same as `Match({p: true})`
    Property(String),
    /// Keep items whose properties all loosely equal the given values
    Match(IndexMap<String, Value>),
    /// Keep items the callback accepts
    Predicate(Predicate<T>),
}

impl<T: Serialize> Filter<T> {
    /// Filter with a callback
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<bool> + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Filter on property values
    pub fn matching<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Filter::Match(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a filter from a dynamic value: a property name, a mapping of
    /// property values, or `null`
    ///
    /// An empty property name keeps everything, like `null`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Filter::None),
            Value::String(property) => Ok(Filter::from(property)),
            Value::Object(map) => Ok(Filter::Match(map.into_iter().collect())),
            other => Err(ContentError::InvalidFilter(format!(
                "expected a property name or a mapping of property values, got {}",
                other
            ))),
        }
    }

    /// Whether this filter keeps every item
    pub fn is_identity(&self) -> bool {
        match self {
            Filter::None => true,
            Filter::Property(property) => property.is_empty(),
            Filter::Match(map) => map.is_empty(),
            Filter::Predicate(_) => false,
        }
    }

    /// Test one item
    pub fn matches(&self, item: &T) -> anyhow::Result<bool> {
        match self {
            Filter::None => Ok(true),
            Filter::Property(property) if property.is_empty() => Ok(true),
            Filter::Property(property) => {
                let normalized = normalize(item)?;
                Ok(is_truthy(resolve(&normalized, property)?))
            }
            Filter::Match(expected) => {
                if expected.is_empty() {
                    return Ok(true);
                }

                let normalized = normalize(item)?;
                for (property, value) in expected {
                    if !loose_eq(resolve(&normalized, property)?, value) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Predicate(predicate) => predicate(item),
        }
    }

    /// Keep the matching items, in order
    pub fn apply(&self, items: Vec<Rc<T>>) -> anyhow::Result<Vec<Rc<T>>> {
        if self.is_identity() {
            return Ok(items);
        }

        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if self.matches(&item)? {
                kept.push(item);
            }
        }
        Ok(kept)
    }
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::None
    }
}

impl<T> From<&str> for Filter<T> {
    fn from(property: &str) -> Self {
        Filter::from(property.to_string())
    }
}

impl<T> From<String> for Filter<T> {
    fn from(property: String) -> Self {
        if property.is_empty() {
            Filter::None
        } else {
            Filter::Property(property)
        }
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::None => f.write_str("Filter::None"),
            Filter::Property(property) => f.debug_tuple("Filter::Property").field(property).finish(),
            Filter::Match(map) => f.debug_tuple("Filter::Match").field(map).finish(),
            Filter::Predicate(_) => f.write_str("Filter::Predicate(..)"),
        }
    }
}
