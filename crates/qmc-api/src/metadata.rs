// Broker type metadata (`service/metadata`).
//
// Shape: `{ Category: { Type: { attributes: { attr: { type, immutable, ... } } } } }`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category/type/attribute metadata published by the broker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    categories: Map<String, Value>,
}

impl Metadata {
    pub fn new(categories: Map<String, Value>) -> Self {
        Self { categories }
    }

    /// Type names registered for `category`, in broker order.
    pub fn types_for_category(&self, category: &str) -> Vec<String> {
        self.categories
            .get(category)
            .and_then(Value::as_object)
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn attributes(&self, category: &str, type_name: &str) -> Option<&Map<String, Value>> {
        self.categories
            .get(category)?
            .get(type_name)?
            .get("attributes")?
            .as_object()
    }

    /// Attribute names declared for a concrete type.
    pub fn attribute_names(&self, category: &str, type_name: &str) -> Vec<String> {
        self.attributes(category, type_name)
            .map(|attrs| attrs.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Declared value type of an attribute (e.g. `String`, `Boolean`, `Password`).
    pub fn attribute_type(&self, category: &str, type_name: &str, attribute: &str) -> Option<&str> {
        self.attributes(category, type_name)?
            .get(attribute)?
            .get("type")?
            .as_str()
    }

    /// Whether the broker refuses changes to `attribute` after creation.
    pub fn is_immutable(&self, category: &str, type_name: &str, attribute: &str) -> bool {
        self.attributes(category, type_name)
            .and_then(|attrs| attrs.get(attribute))
            .and_then(|attr| attr.get("immutable"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
