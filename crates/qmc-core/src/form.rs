// ── Form value collection ──
//
// Gathers edited attribute values into the JSON object sent to the broker.
// When editing an existing object, values equal to what the object already
// holds are dropped so only real changes are submitted.

use serde_json::{Map, Value};

use crate::compare::loosely_equal;
use crate::validate::FieldPattern;

/// How a form field holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Sent only when non-empty; an empty password means "unchanged".
    Password,
    Checkbox,
    /// One of several fields sharing a name; only checked ones contribute.
    Radio,
}

/// One editable attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub value: Value,
    pub checked: bool,
    pub required: bool,
    /// Present in the form but never submitted.
    pub excluded: bool,
    /// Shape a non-empty value must have.
    pub pattern: Option<FieldPattern>,
}

impl FormField {
    fn new(name: impl Into<String>, kind: FieldKind, value: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            checked: false,
            required: false,
            excluded: false,
            pattern: None,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, FieldKind::Text, value.into())
    }

    pub fn password(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, FieldKind::Password, value.into())
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            checked,
            ..Self::new(name, FieldKind::Checkbox, Value::Bool(checked))
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<Value>, checked: bool) -> Self {
        Self {
            checked,
            ..Self::new(name, FieldKind::Radio, value.into())
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: FieldPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Replace the field's value; checkboxes take a boolean or `"true"`/`"false"`.
    pub fn set_value(&mut self, value: Value) {
        if self.kind == FieldKind::Checkbox {
            self.checked = match &value {
                Value::String(s) => s.eq_ignore_ascii_case("true"),
                other => is_truthy(other),
            };
            self.value = Value::Bool(self.checked);
        } else {
            self.value = value;
        }
    }

    /// Required fields must hold a value; patterned fields must match it.
    pub fn is_valid(&self) -> bool {
        if self.excluded {
            return true;
        }
        if self.required && !self.has_value() {
            return false;
        }
        match (self.pattern, value_text(&self.value)) {
            (Some(pattern), Some(text)) if !text.is_empty() => pattern.matches(&text),
            _ => true,
        }
    }

    fn has_value(&self) -> bool {
        self.kind == FieldKind::Checkbox || is_truthy(&self.value)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Names of the fields failing validation, in form order.
pub fn invalid_fields(fields: &[FormField]) -> Vec<&str> {
    fields
        .iter()
        .filter(|field| !field.is_valid())
        .map(|field| field.name.as_str())
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Collect submitted values from `fields`.
///
/// A field contributes when it has a name, is not excluded, and is either
/// required or holds a non-empty value. With `initial` set, entries loosely
/// equal to the initial value of the same attribute are removed.
pub fn form_values(fields: &[FormField], initial: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut values = Map::new();

    for field in fields {
        if field.name.is_empty() || field.excluded || !(field.required || field.has_value()) {
            continue;
        }

        match field.kind {
            FieldKind::Radio => {
                if field.checked {
                    add_radio_value(&mut values, &field.name, field.value.clone());
                }
            }
            FieldKind::Checkbox => {
                values.insert(field.name.clone(), Value::Bool(field.checked));
            }
            FieldKind::Password => {
                if is_truthy(&field.value) {
                    values.insert(field.name.clone(), field.value.clone());
                }
            }
            FieldKind::Text => {
                let value = if is_truthy(&field.value) {
                    field.value.clone()
                } else {
                    Value::Null
                };
                values.insert(field.name.clone(), value);
            }
        }
    }

    if let Some(initial) = initial {
        values.retain(|name, value| !loosely_equal(Some(value), initial.get(name)));
    }
    values
}

fn add_radio_value(values: &mut Map<String, Value>, name: &str, value: Value) {
    match values.get_mut(name) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(current) if is_truthy(current) => {
            let first = current.take();
            *current = Value::Array(vec![first, value]);
        }
        _ => {
            values.insert(name.to_owned(), value);
        }
    }
}

/// Parse a `key=value` assignment; the value is read as JSON when it parses,
/// otherwise taken as a plain string.
pub fn parse_assignment(input: &str) -> Option<(String, Value)> {
    let (key, raw) = input.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Some((key.to_owned(), value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn text_fields() {
        let fields = [
            FormField::text("name", "ldap"),
            FormField::text("description", ""),
            FormField::text("path", "").required(),
            FormField::text("", "ignored"),
        ];
        assert_eq!(
            Value::Object(form_values(&fields, None)),
            json!({"name": "ldap", "path": null})
        );
    }

    #[test]
    fn checkboxes_always_submit() {
        let fields = [
            FormField::checkbox("usePlatformMBeanServer", false),
            FormField::checkbox("durable", true),
        ];
        assert_eq!(
            Value::Object(form_values(&fields, None)),
            json!({"usePlatformMBeanServer": false, "durable": true})
        );
    }

    #[test]
    fn passwords_only_when_set() {
        let fields = [
            FormField::password("password", "").required(),
            FormField::password("keyStorePassword", "s3cret"),
        ];
        assert_eq!(
            Value::Object(form_values(&fields, None)),
            json!({"keyStorePassword": "s3cret"})
        );
    }

    #[test]
    fn radios_collect_checked_values() {
        let fields = [
            FormField::radio("durability", "SYNC", false),
            FormField::radio("durability", "NO_SYNC", true),
            FormField::radio("mode", "a", true),
            FormField::radio("mode", "b", true),
            FormField::radio("mode", "c", true),
        ];
        assert_eq!(
            Value::Object(form_values(&fields, None)),
            json!({"durability": "NO_SYNC", "mode": ["a", "b", "c"]})
        );
    }

    #[test]
    fn excluded_fields_are_skipped() {
        let fields = [FormField::text("confirmPassword", "x").excluded()];
        assert!(form_values(&fields, None).is_empty());
    }

    #[test]
    fn unchanged_values_are_dropped() {
        let initial = object(json!({"name": "jmx", "usePlatformMBeanServer": true, "port": 9099}));
        let fields = [
            FormField::text("name", "jmx"),
            FormField::checkbox("usePlatformMBeanServer", false),
            FormField::text("port", "9099"),
            FormField::text("description", ""),
        ];
        assert_eq!(
            Value::Object(form_values(&fields, Some(&initial))),
            json!({"usePlatformMBeanServer": false})
        );
    }

    #[test]
    fn validation() {
        let fields = [
            FormField::text("name", "").required(),
            FormField::text("port", "80a").with_pattern(FieldPattern::Numeric),
            FormField::text("timeout", 30).with_pattern(FieldPattern::Numeric),
            FormField::text("path", "${qpid.work_dir}").with_pattern(FieldPattern::Numeric),
            FormField::text("optional", "").with_pattern(FieldPattern::Numeric),
        ];
        assert_eq!(invalid_fields(&fields), vec!["name", "port"]);
    }

    #[test]
    fn checkbox_values_from_text() {
        let mut field = FormField::checkbox("usePlatformMBeanServer", true);
        field.set_value(json!("false"));
        assert!(!field.checked);
        assert_eq!(field.value, json!(false));
        field.set_value(json!(true));
        assert!(field.checked);
    }

    #[test]
    fn assignments() {
        assert_eq!(parse_assignment("port=9099"), Some(("port".into(), json!(9099))));
        assert_eq!(parse_assignment("flag=true"), Some(("flag".into(), json!(true))));
        assert_eq!(parse_assignment("path=/etc/groups"), Some(("path".into(), json!("/etc/groups"))));
        assert_eq!(parse_assignment("x=a=b"), Some(("x".into(), json!("a=b"))));
        assert_eq!(parse_assignment("novalue"), None);
        assert_eq!(parse_assignment("=1"), None);
    }
}
