// Add/edit dialog for group providers.

use serde_json::{Map, Value};

use qmc_api::{Metadata, ModelObject};

use super::{DialogMode, Submission, ensure_valid, fields_for_type, set_field};
use crate::error::CoreError;
use crate::form::{FormField, form_values};
use crate::naming::{TypeOption, sorted_type_options};
use crate::validate::FieldPattern;

/// Metadata category of group providers.
pub const GROUP_PROVIDER_CATEGORY: &str = "GroupProvider";

/// Category used in REST paths.
pub const GROUP_PROVIDER_PATH: &str = "groupprovider";

#[derive(Debug, Clone)]
pub struct GroupProviderDialog {
    mode: DialogMode,
    types: Vec<TypeOption>,
    initial: Option<Map<String, Value>>,
    fields: Vec<FormField>,
}

impl GroupProviderDialog {
    /// A blank dialog for creating a group provider.
    pub fn add(metadata: &Metadata) -> Self {
        Self {
            mode: DialogMode::Add,
            types: sorted_type_options(metadata, GROUP_PROVIDER_CATEGORY),
            initial: None,
            fields: base_fields(None),
        }
    }

    /// A dialog editing the provider described by `actual`.
    ///
    /// Type-specific fields are initialised from `actual` for every attribute
    /// the provider's type declares.
    pub fn edit(metadata: &Metadata, actual: Map<String, Value>) -> Self {
        let mut fields = base_fields(Some(&actual));
        if let Some(type_name) = actual.get("type").and_then(Value::as_str) {
            fields.extend(fields_for_type(metadata, GROUP_PROVIDER_CATEGORY, type_name, Some(&actual)));
        }
        Self {
            mode: DialogMode::Edit,
            types: sorted_type_options(metadata, GROUP_PROVIDER_CATEGORY),
            initial: Some(actual),
            fields,
        }
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn title(&self) -> String {
        match (&self.mode, self.name()) {
            (DialogMode::Edit, Some(name)) => format!("Edit Group Provider - {name}"),
            (DialogMode::Edit, None) => "Edit Group Provider".to_owned(),
            (DialogMode::Add, _) => "Add Group Provider".to_owned(),
        }
    }

    /// Name and type are fixed once a provider exists.
    pub fn name_editable(&self) -> bool {
        self.mode == DialogMode::Add
    }

    pub fn type_editable(&self) -> bool {
        self.mode == DialogMode::Add
    }

    /// Provider types the broker supports, sorted by name.
    pub fn types(&self) -> &[TypeOption] {
        &self.types
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    fn name(&self) -> Option<&str> {
        match &self.initial {
            Some(initial) => initial.get("name").and_then(Value::as_str),
            None => self.field_str("name"),
        }
    }

    fn field_str(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_str())
    }

    /// The object an update addresses; `None` when adding.
    pub fn target(&self) -> Option<ModelObject> {
        match self.mode {
            DialogMode::Edit => self.name().map(|name| ModelObject::new(GROUP_PROVIDER_PATH, name)),
            DialogMode::Add => None,
        }
    }

    /// Pick the provider type and rebuild its type-specific fields.
    ///
    /// Values already entered for name and type are kept.
    pub fn select_type(&mut self, metadata: &Metadata, type_name: &str) -> Result<(), CoreError> {
        if !self.type_editable() {
            return Err(CoreError::NotAllowed {
                message: "the type of an existing group provider cannot be changed".into(),
            });
        }
        if !self.types.iter().any(|t| t.id == type_name) {
            return Err(CoreError::ValidationFailed {
                message: format!("Unsupported group provider type '{type_name}'"),
            });
        }

        self.fields.truncate(2);
        set_field(&mut self.fields, "type", Value::String(type_name.to_owned()))?;
        self.fields
            .extend(fields_for_type(metadata, GROUP_PROVIDER_CATEGORY, type_name, None));
        Ok(())
    }

    /// Change the value of one attribute.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), CoreError> {
        if name == "type" {
            return Err(CoreError::NotAllowed {
                message: "use select_type to choose the provider type".into(),
            });
        }
        set_field(&mut self.fields, name, value)
    }

    /// Validate the form and build the request it submits.
    pub fn submit(&self) -> Result<Submission, CoreError> {
        ensure_valid(&self.fields)?;
        let values = form_values(&self.fields, self.initial.as_ref());
        Ok(match self.mode {
            DialogMode::Add => Submission::Create(values),
            DialogMode::Edit => Submission::Update(values),
        })
    }
}

/// Name and type fields, disabled (excluded) when editing.
fn base_fields(actual: Option<&Map<String, Value>>) -> Vec<FormField> {
    let value = |key: &str| {
        actual
            .and_then(|a| a.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    };
    let name = FormField::text("name", value("name"))
        .required()
        .with_pattern(FieldPattern::Name);
    let type_field = FormField::text("type", value("type")).required();

    if actual.is_some() {
        vec![name.excluded(), type_field.excluded()]
    } else {
        vec![name, type_field]
    }
}
