//! Model types and type-erased instances

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// A content type the manager can load
///
/// `TYPE` is the name under which providers are declared for this type in
/// configuration.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Article {
///     slug: String,
///     title: String,
/// }
///
/// impl Model for Article {
///     const TYPE: &'static str = "article";
/// }
/// ```
pub trait Model: Serialize + DeserializeOwned + 'static {
    const TYPE: &'static str;
}

/// A loaded object whose concrete type has been erased
///
/// Implemented for every serializable type, so denormalizers can return any
/// model and the query engine can still reach its properties.
pub trait Instance: Any {
    /// Normalized (serde) form of the object, used for property access
    fn normalize(&self) -> serde_json::Result<Value>;

    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Serialize + 'static> Instance for T {
    fn normalize(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
