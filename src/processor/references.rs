//! Cross-reference resolution between contents

use serde_json::Value;
use std::rc::Weak;

use super::{processor_error, Processor};
use crate::content::Content;
use crate::decoder::Mapping;
use crate::error::Result;
use crate::manager::ContentManager;

const NAME: &str = "ResolveReferencesProcessor";

/// Replaces slugs stored in a property of one content type with the
/// referenced contents
///
/// Only contents of `source_type` are touched. The property may hold a single
/// slug or a list of slugs; each one is loaded as `type_name` through the
/// manager and embedded in its normalized form, so that the model can declare
/// the field with the referenced type. Values that are already mappings are
/// left as they are.
pub struct ResolveReferencesProcessor {
    source_type: String,
    property: String,
    type_name: String,
    manager: Option<Weak<ContentManager>>,
}

impl ResolveReferencesProcessor {
    pub fn new(
        source_type: impl Into<String>,
        property: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            property: property.into(),
            type_name: type_name.into(),
            manager: None,
        }
    }

    fn resolve(&self, manager: &ContentManager, slug: &str, content: &Content) -> Result<Value> {
        let instance = manager.get_instance(&self.type_name, slug)?;
        instance.normalize().map_err(|e| {
            processor_error(
                NAME,
                content,
                format!("cannot normalize {} \"{}\": {}", self.type_name, slug, e),
            )
        })
    }
}

impl Processor for ResolveReferencesProcessor {
    fn process(&self, data: &mut Mapping, type_name: &str, content: &Content) -> Result<()> {
        if type_name != self.source_type {
            return Ok(());
        }

        let Some(value) = data.get(&self.property) else {
            return Ok(());
        };

        if matches!(value, Value::Null | Value::Object(_)) {
            return Ok(());
        }

        let manager = self
            .manager
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| processor_error(NAME, content, "not attached to a content manager"))?;

        let resolved = match value {
            Value::String(slug) => self.resolve(&manager, slug, content)?,
            Value::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(slug) => resolved.push(self.resolve(&manager, slug, content)?),
                        Value::Object(_) => resolved.push(item.clone()),
                        other => {
                            return Err(processor_error(
                                NAME,
                                content,
                                format!("\"{}\" holds {} instead of a slug", self.property, other),
                            ))
                        }
                    }
                }
                Value::Array(resolved)
            }
            other => {
                return Err(processor_error(
                    NAME,
                    content,
                    format!("\"{}\" holds {} instead of a slug", self.property, other),
                ))
            }
        };

        tracing::debug!(
            "Resolved {} reference(s) of \"{}\" in {}",
            self.type_name,
            self.property,
            content.slug()
        );
        data.insert(self.property.clone(), resolved);
        Ok(())
    }

    fn attach(&mut self, manager: Weak<ContentManager>) {
        self.manager = Some(manager);
    }
}
