//! Form field definitions and the field registry
//!
//! The registry is the single pool of canonical field definitions. Steps
//! refer to fields by [`FieldId`] and layer [`FieldPatch`] overrides on top;
//! removing a field here never touches the steps that point at it.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RegistryError;
use crate::ids::{FieldId, IdSource};

/// Input type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldType {
    /// Single-line text
    #[default]
    #[serde(rename = "text")]
    ShortText,
    /// Multi-line text
    #[serde(rename = "textarea")]
    LongText,
    /// Phone number
    #[serde(rename = "tel")]
    Phone,
    /// Email address
    #[serde(rename = "email")]
    Email,
    /// Postal address
    #[serde(rename = "address")]
    Address,
    /// Calendar date
    #[serde(rename = "date")]
    Date,
    /// Time slot
    #[serde(rename = "time")]
    Time,
    /// Numeric input
    #[serde(rename = "number")]
    Number,
    /// Dropdown with options
    #[serde(rename = "select")]
    Select,
    /// Radio group with options
    #[serde(rename = "radio")]
    Radio,
    /// Checkbox group with options
    #[serde(rename = "checkbox")]
    Checkbox,
}

impl FieldType {
    /// Every field type, in wire-name order
    pub const ALL: [FieldType; 11] = [
        Self::ShortText,
        Self::LongText,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::Date,
        Self::Time,
        Self::Number,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
    ];

    /// Wire name, as stored in documents
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShortText => "text",
            Self::LongText => "textarea",
            Self::Phone => "tel",
            Self::Email => "email",
            Self::Address => "address",
            Self::Date => "date",
            Self::Time => "time",
            Self::Number => "number",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// Parse a wire name
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether definitions of this type carry a list of options
    #[inline]
    #[must_use]
    pub fn supports_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of a select, radio or checkbox field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Submitted value
    pub value: String,
    /// Display text
    pub label: String,
}

impl FieldOption {
    /// Option whose label equals its value
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

/// Time slot configuration for `time` fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConfig {
    /// First selectable slot, e.g. `"09:00"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Last selectable slot, e.g. `"18:00"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Minutes between slots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical definition of a form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Stable identifier
    pub id: FieldId,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Input type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Whether a value must be entered
    #[serde(default)]
    pub required: bool,
    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Choices; only kept for option-bearing types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Slot configuration for time fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_config: Option<TimeConfig>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDefinition {
    /// Drop options when the type cannot carry them
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.field_type.supports_options() {
            self.options.clear();
        }
        self
    }
}

/// Input to [`FieldRegistry::add`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDraft {
    /// Explicit id; generated when `None`
    pub id: Option<FieldId>,
    /// Display label
    pub label: String,
    /// Input type
    pub field_type: FieldType,
    /// Whether a value must be entered
    pub required: bool,
    /// Placeholder text
    pub placeholder: Option<String>,
    /// Choices for option-bearing types
    pub options: Vec<FieldOption>,
    /// Slot configuration for time fields
    pub time_config: Option<TimeConfig>,
}

impl FieldDraft {
    /// Draft with a label and type
    #[must_use]
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            field_type,
            ..Self::default()
        }
    }

    /// Request a specific id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<FieldId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set placeholder text
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set choices
    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    fn into_definition(self, id: FieldId) -> FieldDefinition {
        FieldDefinition {
            id,
            label: self.label,
            field_type: self.field_type,
            required: self.required,
            placeholder: self.placeholder,
            options: self.options,
            time_config: self.time_config,
            extra: Map::new(),
        }
        .sanitized()
    }
}

/// Partial field definition
///
/// Used both to update canonical definitions and as a per-step override.
/// `None` means "keep the underlying value".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    /// Replacement label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Replacement type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Replacement required flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Replacement placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Replacement choices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    /// Replacement time configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_config: Option<TimeConfig>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldPatch {
    /// Patch that only changes the label
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.field_type.is_none()
            && self.required.is_none()
            && self.placeholder.is_none()
            && self.options.is_none()
            && self.time_config.is_none()
            && self.extra.is_empty()
    }

    /// Combine with a later patch; values set in `later` win
    #[must_use]
    pub fn merged(&self, later: &FieldPatch) -> FieldPatch {
        let mut extra = self.extra.clone();
        extra.extend(later.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        FieldPatch {
            label: later.label.clone().or_else(|| self.label.clone()),
            field_type: later.field_type.or(self.field_type),
            required: later.required.or(self.required),
            placeholder: later.placeholder.clone().or_else(|| self.placeholder.clone()),
            options: later.options.clone().or_else(|| self.options.clone()),
            time_config: later.time_config.clone().or_else(|| self.time_config.clone()),
            extra,
        }
    }

    /// Layer this patch over a definition
    ///
    /// The id never changes. Options are dropped if the resulting type
    /// cannot carry them.
    #[must_use]
    pub fn apply_to(&self, base: &FieldDefinition) -> FieldDefinition {
        let mut extra = base.extra.clone();
        extra.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        FieldDefinition {
            id: base.id.clone(),
            label: self.label.clone().unwrap_or_else(|| base.label.clone()),
            field_type: self.field_type.unwrap_or(base.field_type),
            required: self.required.unwrap_or(base.required),
            placeholder: self.placeholder.clone().or_else(|| base.placeholder.clone()),
            options: self.options.clone().unwrap_or_else(|| base.options.clone()),
            time_config: self.time_config.clone().or_else(|| base.time_config.clone()),
            extra,
        }
        .sanitized()
    }
}

/// Ordered pool of canonical field definitions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
}

impl FieldRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry over existing definitions, in order
    #[must_use]
    pub fn from_fields(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    /// Definitions in order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Iterate over definitions
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    /// Iterate over ids
    pub fn ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.iter().map(|f| &f.id)
    }

    /// Get number of definitions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a definition
    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Check if a definition exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &FieldId) -> bool {
        self.get(id).is_some()
    }

    /// Append a definition
    ///
    /// A draft without an id gets a fresh one from `ids`; generated ids
    /// that happen to collide are skipped.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateId`] if the draft names an id already in use.
    pub fn add(
        &self,
        draft: FieldDraft,
        ids: &mut dyn IdSource,
    ) -> Result<(Self, FieldId), RegistryError> {
        let id = match draft.id.clone() {
            Some(id) if !id.is_empty() => {
                if self.contains(&id) {
                    return Err(RegistryError::DuplicateId(id));
                }
                id
            }
            _ => loop {
                let candidate = FieldId::new(ids.next_id("field"));
                if !self.contains(&candidate) {
                    break candidate;
                }
            },
        };

        let mut fields = self.fields.clone();
        fields.push(draft.into_definition(id.clone()));
        Ok((Self { fields }, id))
    }

    /// Apply a patch to an existing definition
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no definition has this id.
    pub fn update(&self, id: &FieldId, patch: &FieldPatch) -> Result<Self, RegistryError> {
        let index = self.position(id)?;
        let mut fields = self.fields.clone();
        fields[index] = patch.apply_to(&fields[index]);
        Ok(Self { fields })
    }

    /// Remove a definition
    ///
    /// Steps that reference the field are left as they are and show up as
    /// dangling references afterwards.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no definition has this id.
    pub fn remove(&self, id: &FieldId) -> Result<Self, RegistryError> {
        let index = self.position(id)?;
        let mut fields = self.fields.clone();
        fields.remove(index);
        Ok(Self { fields })
    }

    /// Options of an option-bearing field
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`] if no definition has this id
    /// - [`RegistryError::NotApplicable`] if the field type has no options
    pub fn options_of(&self, id: &FieldId) -> Result<&[FieldOption], RegistryError> {
        let field = self
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        if field.field_type.supports_options() {
            Ok(&field.options)
        } else {
            Err(RegistryError::NotApplicable {
                id: id.clone(),
                field_type: field.field_type,
            })
        }
    }

    fn position(&self, id: &FieldId) -> Result<usize, RegistryError> {
        self.fields
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn registry() -> FieldRegistry {
        let mut ids = SequentialIds::new();
        let (reg, _) = FieldRegistry::new()
            .add(FieldDraft::new("Name", FieldType::ShortText).with_id("name").required(true), &mut ids)
            .unwrap();
        let (reg, _) = reg
            .add(
                FieldDraft::new("Plan", FieldType::Select)
                    .with_id("plan")
                    .with_options(vec![FieldOption::plain("basic"), FieldOption::plain("pro")]),
                &mut ids,
            )
            .unwrap();
        reg
    }

    #[test]
    fn add_generates_fresh_id() {
        let reg = registry();
        let (next, id) = reg
            .add(FieldDraft::new("Phone", FieldType::Phone), &mut SequentialIds::new())
            .unwrap();
        assert_eq!(id, "field_1");
        assert_eq!(next.len(), 3);
        assert_eq!(reg.len(), 2);
        assert_eq!(next.get(&id).unwrap().field_type, FieldType::Phone);
    }

    #[test]
    fn add_skips_colliding_generated_id() {
        let reg = FieldRegistry::new()
            .add(FieldDraft::new("A", FieldType::ShortText).with_id("field_1"), &mut SequentialIds::new())
            .unwrap()
            .0;
        let (_, id) = reg
            .add(FieldDraft::new("B", FieldType::ShortText), &mut SequentialIds::new())
            .unwrap();
        assert_eq!(id, "field_2");
    }

    #[test]
    fn add_explicit_duplicate_fails() {
        let err = registry()
            .add(FieldDraft::new("Again", FieldType::Email).with_id("name"), &mut SequentialIds::new())
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("name".into()));
    }

    #[test]
    fn add_clears_options_for_plain_types() {
        let (reg, id) = FieldRegistry::new()
            .add(
                FieldDraft::new("Memo", FieldType::LongText).with_options(vec![FieldOption::plain("x")]),
                &mut SequentialIds::new(),
            )
            .unwrap();
        assert!(reg.get(&id).unwrap().options.is_empty());
    }

    #[test]
    fn update_patches_only_given_values() {
        let reg = registry()
            .update(&"name".into(), &FieldPatch::label("Full name"))
            .unwrap();
        let field = reg.get(&"name".into()).unwrap();
        assert_eq!(field.label, "Full name");
        assert!(field.required);
    }

    #[test]
    fn update_missing_fails() {
        let err = registry().update(&"nope".into(), &FieldPatch::default()).unwrap_err();
        assert_eq!(err, RegistryError::NotFound("nope".into()));
    }

    #[test]
    fn retype_to_text_drops_options() {
        let patch = FieldPatch {
            field_type: Some(FieldType::ShortText),
            ..FieldPatch::default()
        };
        let reg = registry().update(&"plan".into(), &patch).unwrap();
        assert!(matches!(
            reg.options_of(&"plan".into()),
            Err(RegistryError::NotApplicable { .. })
        ));
    }

    #[test]
    fn remove_then_missing() {
        let reg = registry().remove(&"name".into()).unwrap();
        assert!(!reg.contains(&"name".into()));
        assert_eq!(
            reg.remove(&"name".into()).unwrap_err(),
            RegistryError::NotFound("name".into())
        );
    }

    #[test]
    fn options_of_select() {
        let reg = registry();
        let options = reg.options_of(&"plan".into()).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].value, "pro");
    }

    #[test]
    fn options_of_text_is_not_applicable() {
        let err = registry().options_of(&"name".into()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::NotApplicable {
                id: "name".into(),
                field_type: FieldType::ShortText
            }
        );
    }

    #[test]
    fn patch_merge_later_wins() {
        let first = FieldPatch {
            label: Some("A".into()),
            required: Some(true),
            ..FieldPatch::default()
        };
        let merged = first.merged(&FieldPatch::label("B"));
        assert_eq!(merged.label.as_deref(), Some("B"));
        assert_eq!(merged.required, Some(true));
    }

    #[test]
    fn field_type_wire_names() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::from_wire(t.as_str()), Some(t));
            assert_eq!(serde_json::to_value(t).unwrap(), serde_json::json!(t.as_str()));
        }
        assert_eq!(FieldType::from_wire("slider"), None);
    }

    #[test]
    fn definition_keeps_unknown_keys() {
        let json = serde_json::json!({
            "id": "memo", "label": "Memo", "type": "textarea", "required": false, "rows": 4
        });
        let field: FieldDefinition = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(field.extra.get("rows"), Some(&serde_json::json!(4)));
        assert_eq!(serde_json::to_value(&field).unwrap(), json);
    }
}
