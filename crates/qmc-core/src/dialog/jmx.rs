// Edit dialog for the JMX management plugin.

use serde_json::{Map, Value};

use qmc_api::{Metadata, ModelObject};

use super::{ensure_valid, fields_for_type, set_field};
use crate::error::CoreError;
use crate::form::{FormField, form_values};

/// Metadata category of broker plugins.
pub const PLUGIN_CATEGORY: &str = "Plugin";

/// Plugin type of the JMX management plugin.
pub const JMX_PLUGIN_TYPE: &str = "MANAGEMENT-JMX";

#[derive(Debug, Clone)]
pub struct JmxPluginDialog {
    target: ModelObject,
    initial: Map<String, Value>,
    fields: Vec<FormField>,
}

impl JmxPluginDialog {
    /// Build the editor from the plugin's actual (unresolved) attribute values.
    pub fn new(target: ModelObject, metadata: &Metadata, actual: Map<String, Value>) -> Self {
        let fields = fields_for_type(metadata, PLUGIN_CATEGORY, JMX_PLUGIN_TYPE, Some(&actual));
        Self {
            target,
            initial: actual,
            fields,
        }
    }

    pub fn title(&self) -> String {
        format!("Edit JMX Management Plugin - {}", self.target.name)
    }

    pub fn target(&self) -> &ModelObject {
        &self.target
    }

    pub fn initial(&self) -> &Map<String, Value> {
        &self.initial
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), CoreError> {
        set_field(&mut self.fields, name, value)
    }

    /// Validate and return only the attributes that changed.
    pub fn save(&self) -> Result<Map<String, Value>, CoreError> {
        ensure_valid(&self.fields)?;
        Ok(form_values(&self.fields, Some(&self.initial)))
    }
}
