// ── Dialog view-models ──
//
// Add/edit dialogs hold a list of form fields built from broker metadata,
// accept edits by attribute name, and turn the result into the body of a
// create or update request.

pub mod group_provider;
pub mod jmx;

use serde_json::{Map, Value};

use qmc_api::Metadata;

use crate::error::CoreError;
use crate::form::{FormField, invalid_fields};
use crate::validate::FieldPattern;

pub use group_provider::GroupProviderDialog;
pub use jmx::JmxPluginDialog;

/// Attributes every object carries that dialogs never edit directly.
const MANAGED_ATTRIBUTES: [&str; 7] = [
    "id",
    "name",
    "type",
    "lastUpdatedBy",
    "lastUpdatedTime",
    "createdBy",
    "createdTime",
];

/// Whether a dialog creates a new object or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit,
}

/// What a submitted dialog asks the broker to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// POST the full set of entered values.
    Create(Map<String, Value>),
    /// PUT only the values that differ from the loaded object.
    Update(Map<String, Value>),
}

impl Submission {
    pub fn values(&self) -> &Map<String, Value> {
        match self {
            Self::Create(values) | Self::Update(values) => values,
        }
    }
}

/// Form fields for the editable attributes `metadata` declares on
/// `category`/`type_name`, initialised from `data` when editing.
///
/// Booleans become checkboxes and passwords start empty. Immutable
/// attributes are excluded when editing.
pub fn fields_for_type(
    metadata: &Metadata,
    category: &str,
    type_name: &str,
    data: Option<&Map<String, Value>>,
) -> Vec<FormField> {
    metadata
        .attribute_names(category, type_name)
        .into_iter()
        .filter(|name| !MANAGED_ATTRIBUTES.contains(&name.as_str()))
        .map(|name| {
            let current = data.and_then(|d| d.get(&name)).cloned().unwrap_or(Value::Null);
            let field = match metadata.attribute_type(category, type_name, &name) {
                Some("Boolean") => FormField::checkbox(&name, current.as_bool().unwrap_or(false)),
                Some("Password") => FormField::password(&name, Value::Null),
                Some("Integer" | "Long") => FormField::text(&name, current).with_pattern(FieldPattern::Signed),
                _ => FormField::text(&name, current),
            };
            if data.is_some() && metadata.is_immutable(category, type_name, &name) {
                field.excluded()
            } else {
                field
            }
        })
        .collect()
}

/// Set the value of the field called `name`.
pub(crate) fn set_field(fields: &mut [FormField], name: &str, value: Value) -> Result<(), CoreError> {
    let field = fields
        .iter_mut()
        .find(|field| field.name == name)
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!("Unknown attribute '{name}'"),
        })?;
    if field.excluded {
        return Err(CoreError::NotAllowed {
            message: format!("attribute '{name}' cannot be changed"),
        });
    }
    field.set_value(value);
    Ok(())
}

/// Fail with the form-level message when any field is invalid.
pub(crate) fn ensure_valid(fields: &[FormField]) -> Result<(), CoreError> {
    let invalid = invalid_fields(fields);
    if invalid.is_empty() {
        Ok(())
    } else {
        tracing::debug!(?invalid, "form validation failed");
        Err(CoreError::invalid_form())
    }
}
