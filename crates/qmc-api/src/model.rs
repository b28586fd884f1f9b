// Model object addressing.
//
// Every configured object on the broker lives at
// `api/latest/{category}/{ancestor}/.../{name}`; the broker itself is the
// implicit root and never appears in the path.

use serde::{Deserialize, Serialize};

/// A reference to one configured object in the broker hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelObject {
    /// Category name as used in REST paths, e.g. `virtualhostnode`.
    pub category: String,
    pub name: String,
    pub parent: Option<Box<ModelObject>>,
}

impl ModelObject {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into().to_lowercase(),
            name: name.into(),
            parent: None,
        }
    }

    /// Attach this object beneath `parent`.
    #[must_use]
    pub fn child_of(mut self, parent: ModelObject) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Names from the top-most ancestor down to this object.
    pub fn name_chain(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(obj) = current {
            names.push(obj.name.as_str());
            current = obj.parent.as_deref();
        }
        names.reverse();
        names
    }

    /// Path segments below `api/latest/` addressing this object.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = vec![self.category.as_str()];
        segments.extend(self.name_chain());
        segments
    }

    /// Path segments of the collection of `category` objects under `parent`.
    pub fn collection_segments<'a>(
        category: &'a str,
        parent: Option<&'a ModelObject>,
    ) -> Vec<&'a str> {
        let mut segments = vec![category];
        if let Some(parent) = parent {
            segments.extend(parent.name_chain());
        }
        segments
    }
}

impl std::fmt::Display for ModelObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}
