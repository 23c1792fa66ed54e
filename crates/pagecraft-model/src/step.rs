//! Ordered steps of a multi-page input flow
//!
//! A [`Step`] binds fields from the [`FieldRegistry`] by id and may layer a
//! per-step [`FieldPatch`] over each bound field. Steps never own field
//! definitions, so reordering steps or editing the registry cannot corrupt
//! either side; broken links surface through
//! [`validate_references`](crate::validate_references).

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StepError;
use crate::field::{FieldDefinition, FieldPatch, FieldRegistry};
use crate::ids::{BlockId, FieldId, IdSource, StepId};

/// Role of a step within the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Opening page
    Intro,
    /// Content page showing a detail block
    Content,
    /// Page of form fields
    Form,
    /// Closing page that submits the form
    Outro,
}

impl StepKind {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Content => "content",
            Self::Form => "form",
            Self::Outro => "outro",
        }
    }

    /// Default label of the primary button
    #[must_use]
    pub fn default_button_text(self) -> &'static str {
        match self {
            Self::Outro => "submit",
            Self::Intro | Self::Content | Self::Form => "next",
        }
    }

    /// Whether a fresh step of this kind shows a "previous" control
    #[must_use]
    pub fn shows_prev_by_default(self) -> bool {
        !matches!(self, Self::Intro)
    }

    /// Whether steps of this kind may point at a content block
    #[must_use]
    pub fn accepts_content(self) -> bool {
        !matches!(self, Self::Form)
    }
}

impl Display for StepKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of the flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    id: StepId,
    #[serde(rename = "type")]
    kind: StepKind,
    /// Heading shown on the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Bound fields, in display order, without duplicates
    #[serde(default)]
    pub field_ids: Vec<FieldId>,
    /// Per-field overrides layered over the canonical definitions
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub field_overrides: IndexMap<FieldId, FieldPatch>,
    /// Detail block shown by intro, content and outro steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<BlockId>,
    /// Extra detail block rendered below the step body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_content_id: Option<BlockId>,
    /// Primary button label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    /// Whether the "previous" control is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_prev_button: Option<bool>,
    /// Label of the "previous" control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_button_text: Option<String>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    /// Fresh step with kind-appropriate navigation defaults
    #[must_use]
    pub fn new(id: impl Into<StepId>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            field_ids: Vec::new(),
            field_overrides: IndexMap::new(),
            content_id: None,
            inserted_content_id: None,
            button_text: Some(kind.default_button_text().to_string()),
            show_prev_button: Some(kind.shows_prev_by_default()),
            prev_button_text: kind.shows_prev_by_default().then(|| "previous".to_string()),
            extra: Map::new(),
        }
    }

    /// Step identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &StepId {
        &self.id
    }

    /// Step kind, fixed at creation
    #[inline]
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Primary button label, falling back to the kind default
    #[must_use]
    pub fn primary_label(&self) -> &str {
        self.button_text
            .as_deref()
            .unwrap_or_else(|| self.kind.default_button_text())
    }

    /// Whether the field is bound to this step
    #[inline]
    #[must_use]
    pub fn binds(&self, field: &FieldId) -> bool {
        self.field_ids.contains(field)
    }
}

/// Direction for [`StepSequence::move_step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start
    Up,
    /// Towards the end
    Down,
}

/// Result of [`StepSequence::move_step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Step swapped places with its neighbour
    Moved {
        /// Previous position
        from: usize,
        /// New position
        to: usize,
    },
    /// Step already at the boundary in that direction
    NoOp,
}

/// Ordered list of steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    /// Create new empty sequence
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence over existing steps, in order
    #[must_use]
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Steps in order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Iterate over steps
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Get number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if sequence is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Look up a step
    #[must_use]
    pub fn get(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    /// Position of a step
    #[must_use]
    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == id)
    }

    /// Insert a fresh step of `kind` at `at_index`
    ///
    /// Indices past the end append.
    #[must_use]
    pub fn insert(&self, kind: StepKind, at_index: usize, ids: &mut dyn IdSource) -> (Self, StepId) {
        let id = loop {
            let candidate = StepId::new(ids.next_id("step"));
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };
        let mut steps = self.steps.clone();
        steps.insert(at_index.min(steps.len()), Step::new(id.clone(), kind));
        (Self { steps }, id)
    }

    /// Swap a step with its neighbour
    ///
    /// Moving past either end is not an error; it reports
    /// [`MoveOutcome::NoOp`] and returns an identical sequence.
    ///
    /// # Errors
    /// [`StepError::NotFound`] if no step has this id.
    pub fn move_step(&self, id: &StepId, direction: Direction) -> Result<(Self, MoveOutcome), StepError> {
        let from = self.index_of(id)?;
        let to = match direction {
            Direction::Up => from.checked_sub(1),
            Direction::Down => Some(from + 1).filter(|&to| to < self.steps.len()),
        };
        let Some(to) = to else {
            return Ok((self.clone(), MoveOutcome::NoOp));
        };
        let mut steps = self.steps.clone();
        steps.swap(from, to);
        Ok((Self { steps }, MoveOutcome::Moved { from, to }))
    }

    /// Remove a step
    ///
    /// # Errors
    /// [`StepError::NotFound`] if no step has this id.
    pub fn remove(&self, id: &StepId) -> Result<Self, StepError> {
        let index = self.index_of(id)?;
        let mut steps = self.steps.clone();
        steps.remove(index);
        Ok(Self { steps })
    }

    /// Bind a registry field to a step
    ///
    /// Binding an already bound field changes nothing.
    ///
    /// # Errors
    /// - [`StepError::NotFound`] if no step has this id
    /// - [`StepError::FieldNotFound`] if the registry has no such field
    pub fn bind_field(&self, step: &StepId, field: &FieldId, registry: &FieldRegistry) -> Result<Self, StepError> {
        if !registry.contains(field) {
            return Err(StepError::FieldNotFound(field.clone()));
        }
        self.edit(step, |s| {
            if !s.binds(field) {
                s.field_ids.push(field.clone());
            }
            Ok(())
        })
    }

    /// Unbind a field, dropping its override as well
    ///
    /// # Errors
    /// [`StepError::NotFound`] if no step has this id.
    pub fn unbind_field(&self, step: &StepId, field: &FieldId) -> Result<Self, StepError> {
        self.edit(step, |s| {
            s.field_ids.retain(|f| f != field);
            s.field_overrides.shift_remove(field);
            Ok(())
        })
    }

    /// Layer an override over a bound field for this step only
    ///
    /// The patch is merged over any override the step already has.
    ///
    /// # Errors
    /// - [`StepError::NotFound`] if no step has this id
    /// - [`StepError::NotBound`] if the field is not bound to the step
    pub fn override_field(&self, step: &StepId, field: &FieldId, patch: &FieldPatch) -> Result<Self, StepError> {
        self.edit(step, |s| {
            if !s.binds(field) {
                return Err(StepError::NotBound {
                    step: s.id.clone(),
                    field: field.clone(),
                });
            }
            let merged = s
                .field_overrides
                .get(field)
                .map_or_else(|| patch.clone(), |existing| existing.merged(patch));
            s.field_overrides.insert(field.clone(), merged);
            Ok(())
        })
    }

    /// Drop a step's override for a field
    ///
    /// # Errors
    /// [`StepError::NotFound`] if no step has this id.
    pub fn clear_override(&self, step: &StepId, field: &FieldId) -> Result<Self, StepError> {
        self.edit(step, |s| {
            s.field_overrides.shift_remove(field);
            Ok(())
        })
    }

    /// Point a step at a content block, or clear the pointer
    ///
    /// # Errors
    /// - [`StepError::NotFound`] if no step has this id
    /// - [`StepError::ContentRefNotAllowed`] for form steps
    pub fn set_content_ref(&self, step: &StepId, block: Option<BlockId>) -> Result<Self, StepError> {
        self.edit(step, |s| {
            if !s.kind.accepts_content() {
                return Err(StepError::ContentRefNotAllowed(s.id.clone()));
            }
            s.content_id = block;
            Ok(())
        })
    }

    /// Field as rendered on a step: canonical definition plus the step's override
    ///
    /// # Errors
    /// - [`StepError::NotFound`] if no step has this id
    /// - [`StepError::NotBound`] if the field is not bound to the step
    /// - [`StepError::FieldNotFound`] if the bound field is gone from the registry
    pub fn effective_field(
        &self,
        step: &StepId,
        field: &FieldId,
        registry: &FieldRegistry,
    ) -> Result<FieldDefinition, StepError> {
        let s = self.get(step).ok_or_else(|| StepError::NotFound(step.clone()))?;
        if !s.binds(field) {
            return Err(StepError::NotBound {
                step: step.clone(),
                field: field.clone(),
            });
        }
        let base = registry
            .get(field)
            .ok_or_else(|| StepError::FieldNotFound(field.clone()))?;
        Ok(layer(s, base))
    }

    /// All fields of a step as rendered, in binding order
    ///
    /// Bound ids missing from the registry are skipped.
    ///
    /// # Errors
    /// [`StepError::NotFound`] if no step has this id.
    pub fn effective_fields(&self, step: &StepId, registry: &FieldRegistry) -> Result<Vec<FieldDefinition>, StepError> {
        let s = self.get(step).ok_or_else(|| StepError::NotFound(step.clone()))?;
        Ok(s.field_ids
            .iter()
            .filter_map(|id| registry.get(id))
            .map(|base| layer(s, base))
            .collect())
    }

    fn index_of(&self, id: &StepId) -> Result<usize, StepError> {
        self.position(id).ok_or_else(|| StepError::NotFound(id.clone()))
    }

    fn edit<F>(&self, id: &StepId, f: F) -> Result<Self, StepError>
    where
        F: FnOnce(&mut Step) -> Result<(), StepError>,
    {
        let index = self.index_of(id)?;
        let mut steps = self.steps.clone();
        f(&mut steps[index])?;
        Ok(Self { steps })
    }
}

fn layer(step: &Step, base: &FieldDefinition) -> FieldDefinition {
    step.field_overrides
        .get(&base.id)
        .map_or_else(|| base.clone(), |patch| patch.apply_to(base))
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDraft, FieldType};
    use crate::ids::SequentialIds;

    fn registry() -> FieldRegistry {
        let mut ids = SequentialIds::new();
        let (reg, _) = FieldRegistry::new()
            .add(FieldDraft::new("Name", FieldType::ShortText).with_id("f1"), &mut ids)
            .unwrap();
        let (reg, _) = reg
            .add(FieldDraft::new("Phone", FieldType::Phone).with_id("f2"), &mut ids)
            .unwrap();
        reg
    }

    fn sequence() -> StepSequence {
        StepSequence::from_steps(vec![
            Step::new("s0", StepKind::Intro),
            Step::new("s1", StepKind::Form),
            Step::new("s2", StepKind::Outro),
        ])
    }

    #[test]
    fn insert_applies_kind_defaults() {
        let mut ids = SequentialIds::new();
        let (seq, outro) = StepSequence::new().insert(StepKind::Outro, 0, &mut ids);
        let (seq, intro) = seq.insert(StepKind::Intro, 0, &mut ids);

        assert_eq!(seq.get(&outro).unwrap().primary_label(), "submit");
        assert_eq!(seq.get(&intro).unwrap().primary_label(), "next");
        assert_eq!(seq.get(&intro).unwrap().show_prev_button, Some(false));
        assert_eq!(seq.position(&intro), Some(0));
        assert_eq!(seq.position(&outro), Some(1));
    }

    #[test]
    fn insert_past_end_appends() {
        let (seq, id) = sequence().insert(StepKind::Content, 99, &mut SequentialIds::new());
        assert_eq!(seq.position(&id), Some(3));
    }

    #[test]
    fn move_swaps_neighbours() {
        let (seq, outcome) = sequence().move_step(&"s1".into(), Direction::Up).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved { from: 1, to: 0 });
        let order: Vec<_> = seq.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(order, ["s1", "s0", "s2"]);
    }

    #[test]
    fn move_at_boundary_is_noop() {
        let seq = sequence();
        let (up, outcome) = seq.move_step(&"s0".into(), Direction::Up).unwrap();
        assert_eq!(outcome, MoveOutcome::NoOp);
        assert_eq!(up, seq);

        let (_, outcome) = seq.move_step(&"s2".into(), Direction::Down).unwrap();
        assert_eq!(outcome, MoveOutcome::NoOp);
    }

    #[test]
    fn move_missing_step_fails() {
        let err = sequence().move_step(&"zz".into(), Direction::Down).unwrap_err();
        assert_eq!(err, StepError::NotFound("zz".into()));
    }

    #[test]
    fn remove_step() {
        let seq = sequence().remove(&"s1".into()).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.get(&"s1".into()).is_none());
    }

    #[test]
    fn bind_is_idempotent() {
        let reg = registry();
        let seq = sequence()
            .bind_field(&"s1".into(), &"f1".into(), &reg)
            .unwrap()
            .bind_field(&"s1".into(), &"f1".into(), &reg)
            .unwrap();
        assert_eq!(seq.get(&"s1".into()).unwrap().field_ids, vec![FieldId::from("f1")]);
    }

    #[test]
    fn bind_unknown_field_fails() {
        let err = sequence()
            .bind_field(&"s1".into(), &"ghost".into(), &registry())
            .unwrap_err();
        assert_eq!(err, StepError::FieldNotFound("ghost".into()));
    }

    #[test]
    fn override_requires_binding() {
        let err = sequence()
            .override_field(&"s1".into(), &"f1".into(), &FieldPatch::label("X"))
            .unwrap_err();
        assert!(matches!(err, StepError::NotBound { .. }));
    }

    #[test]
    fn override_layers_per_step() {
        let reg = registry();
        let seq = sequence()
            .bind_field(&"s1".into(), &"f1".into(), &reg)
            .unwrap()
            .bind_field(&"s2".into(), &"f1".into(), &reg)
            .unwrap()
            .override_field(&"s1".into(), &"f1".into(), &FieldPatch::label("X"))
            .unwrap();

        let on_s1 = seq.effective_field(&"s1".into(), &"f1".into(), &reg).unwrap();
        let on_s2 = seq.effective_field(&"s2".into(), &"f1".into(), &reg).unwrap();
        assert_eq!(on_s1.label, "X");
        assert_eq!(on_s2.label, "Name");
        assert_eq!(reg.get(&"f1".into()).unwrap().label, "Name");
    }

    #[test]
    fn override_merges_with_existing() {
        let reg = registry();
        let required = FieldPatch {
            required: Some(true),
            ..FieldPatch::default()
        };
        let seq = sequence()
            .bind_field(&"s1".into(), &"f1".into(), &reg)
            .unwrap()
            .override_field(&"s1".into(), &"f1".into(), &FieldPatch::label("X"))
            .unwrap()
            .override_field(&"s1".into(), &"f1".into(), &required)
            .unwrap();
        let field = seq.effective_field(&"s1".into(), &"f1".into(), &reg).unwrap();
        assert_eq!(field.label, "X");
        assert!(field.required);
    }

    #[test]
    fn unbind_drops_override() {
        let reg = registry();
        let seq = sequence()
            .bind_field(&"s1".into(), &"f1".into(), &reg)
            .unwrap()
            .override_field(&"s1".into(), &"f1".into(), &FieldPatch::label("X"))
            .unwrap()
            .unbind_field(&"s1".into(), &"f1".into())
            .unwrap();
        let step = seq.get(&"s1".into()).unwrap();
        assert!(step.field_ids.is_empty());
        assert!(step.field_overrides.is_empty());
    }

    #[test]
    fn effective_fields_skip_dangling() {
        let reg = registry();
        let seq = sequence()
            .bind_field(&"s1".into(), &"f1".into(), &reg)
            .unwrap()
            .bind_field(&"s1".into(), &"f2".into(), &reg)
            .unwrap();
        let reg = reg.remove(&"f1".into()).unwrap();
        let fields = seq.effective_fields(&"s1".into(), &reg).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "f2");
    }

    #[test]
    fn content_ref_rejected_on_form_step() {
        let seq = sequence();
        assert_eq!(
            seq.set_content_ref(&"s1".into(), Some("b1".into())).unwrap_err(),
            StepError::ContentRefNotAllowed("s1".into())
        );
        let seq = seq.set_content_ref(&"s0".into(), Some("b1".into())).unwrap();
        assert_eq!(seq.get(&"s0".into()).unwrap().content_id, Some(BlockId::from("b1")));
    }

    #[test]
    fn step_wire_shape() {
        let json = serde_json::json!({
            "id": "s1",
            "type": "form",
            "fieldIds": ["f1"],
            "fieldOverrides": {"f1": {"label": "X"}},
            "buttonText": "Go",
            "stepBackground": "#fff"
        });
        let step: Step = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(step.kind(), StepKind::Form);
        assert_eq!(step.primary_label(), "Go");
        assert_eq!(step.extra.get("stepBackground"), Some(&serde_json::json!("#fff")));
        assert_eq!(serde_json::to_value(&step).unwrap(), json);
    }
}
