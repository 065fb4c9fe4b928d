//! Content ordering

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use super::property::{compare, normalize, resolve};
use crate::error::{ContentError, Result};

/// Comparator callback used by [`Sort::Comparator`]
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> anyhow::Result<Ordering>>;

/// How to order a listing
pub enum Sort<T> {
    /// Keep the order items were listed in
    None,
    /// Ascending by one property, same as `Keys([(p, true)])`
    Property(String),
    /// By several properties; the flag is `true` for ascending
    Keys(Vec<(String, bool)>),
    /// By a callback
    Comparator(Comparator<T>),
}

impl<T: Serialize> Sort<T> {
    /// Sort with a callback
    pub fn comparator<F>(f: F) -> Self
    where
        F: Fn(&T, &T) -> anyhow::Result<Ordering> + 'static,
    {
        Sort::Comparator(Box::new(f))
    }

    /// Sort by properties, in the given order of precedence
    pub fn by<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Sort::Keys(keys.into_iter().map(|(k, asc)| (k.into(), asc)).collect())
    }

    /// Build a sort from a dynamic value: a property name, a mapping of
    /// property names to ascending flags, or `null`
    ///
    /// An empty property name keeps the listing order, like `null`.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Sort::None),
            Value::String(property) => Ok(Sort::from(property)),
            Value::Object(map) => map
                .into_iter()
                .map(|(property, ascending)| match ascending {
                    Value::Bool(ascending) => Ok((property, ascending)),
                    other => Err(ContentError::InvalidSort(format!(
                        "direction of \"{}\" must be a boolean, got {}",
                        property, other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Sort::Keys),
            other => Err(ContentError::InvalidSort(format!(
                "expected a property name or a mapping of directions, got {}",
                other
            ))),
        }
    }

    /// Whether this sort keeps the listing order
    pub fn is_identity(&self) -> bool {
        match self {
            Sort::None => true,
            Sort::Property(property) => property.is_empty(),
            Sort::Keys(keys) => keys.is_empty(),
            Sort::Comparator(_) => false,
        }
    }

    /// Order the items
    ///
    /// The sort is stable. The first error raised by the comparator, or by
    /// reading and comparing properties, stops the sort and is returned.
    pub fn apply(&self, items: Vec<Rc<T>>) -> anyhow::Result<Vec<Rc<T>>> {
        match self {
            Sort::None => Ok(items),
            Sort::Property(property) if property.is_empty() => Ok(items),
            Sort::Property(property) => sort_by_keys(items, &[(property.clone(), true)]),
            Sort::Keys(keys) if keys.is_empty() => Ok(items),
            Sort::Keys(keys) => sort_by_keys(items, keys),
            Sort::Comparator(comparator) => try_sort_by(items, |a, b| comparator(&**a, &**b)),
        }
    }
}

/// Decorate each item with its sort keys once, then sort on them
fn sort_by_keys<T: Serialize>(
    items: Vec<Rc<T>>,
    keys: &[(String, bool)],
) -> anyhow::Result<Vec<Rc<T>>> {
    let mut decorated = Vec::with_capacity(items.len());
    for item in items {
        let normalized = normalize(&*item)?;
        let values = keys
            .iter()
            .map(|(property, _)| resolve(&normalized, property).cloned())
            .collect::<Result<Vec<Value>>>()?;
        decorated.push((values, item));
    }

    let sorted = try_sort_by::<_, ContentError, _>(decorated, |(a, _), (b, _)| {
        for ((x, y), (_, ascending)) in a.iter().zip(b).zip(keys) {
            let ordering = compare(x, y)?;
            if ordering != Ordering::Equal {
                return Ok(if *ascending { ordering } else { ordering.reverse() });
            }
        }
        Ok(Ordering::Equal)
    })?;

    Ok(sorted.into_iter().map(|(_, item)| item).collect())
}

/// Stable merge sort with a fallible comparator
///
/// Stops at the first comparator error; the partially sorted items are
/// dropped.
pub fn try_sort_by<T, E, F>(items: Vec<T>, mut compare: F) -> std::result::Result<Vec<T>, E>
where
    F: FnMut(&T, &T) -> std::result::Result<Ordering, E>,
{
    merge_sort(items, &mut compare)
}

fn merge_sort<T, E, F>(mut items: Vec<T>, compare: &mut F) -> std::result::Result<Vec<T>, E>
where
    F: FnMut(&T, &T) -> std::result::Result<Ordering, E>,
{
    if items.len() <= 1 {
        return Ok(items);
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Take from the left on ties to keep the sort stable
        let take_right = compare(r, l)? == Ordering::Less;
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);

    Ok(merged)
}

impl<T> Default for Sort<T> {
    fn default() -> Self {
        Sort::None
    }
}

impl<T> From<&str> for Sort<T> {
    fn from(property: &str) -> Self {
        Sort::from(property.to_string())
    }
}

impl<T> From<String> for Sort<T> {
    fn from(property: String) -> Self {
        if property.is_empty() {
            Sort::None
        } else {
            Sort::Property(property)
        }
    }
}

impl<T> fmt::Debug for Sort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::None => f.write_str("Sort::None"),
            Sort::Property(property) => f.debug_tuple("Sort::Property").field(property).finish(),
            Sort::Keys(keys) => f.debug_tuple("Sort::Keys").field(keys).finish(),
            Sort::Comparator(_) => f.write_str("Sort::Comparator(..)"),
        }
    }
}
