//! Cross-section reference checks
//!
//! Steps point at fields and content blocks, banners point at content
//! blocks. None of these links is enforced on write; they are reported here
//! and pruned only on request.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use tracing::debug;

use crate::document::ConfigDocument;
use crate::ids::{BannerId, BlockId, FieldId, StepId};
use crate::step::{Step, StepSequence};

/// A pointer id that does not resolve in its target collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DanglingReference {
    /// `fieldIds` entry missing from the field registry
    Field {
        /// Step holding the pointer
        step: StepId,
        /// Unresolved field id
        field: FieldId,
    },
    /// `fieldOverrides` key that is not in the step's `fieldIds`
    Override {
        /// Step holding the override
        step: StepId,
        /// Field id the override is keyed by
        field: FieldId,
    },
    /// `contentId` or `insertedContentId` missing from the detail blocks
    Content {
        /// Step holding the pointer
        step: StepId,
        /// Unresolved block id
        block: BlockId,
    },
    /// Banner click target missing from the detail blocks
    BannerTarget {
        /// Banner holding the pointer
        banner: BannerId,
        /// Unresolved block id
        block: BlockId,
    },
}

impl Display for DanglingReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { step, field } => write!(f, "step '{step}' references missing field '{field}'"),
            Self::Override { step, field } => {
                write!(f, "step '{step}' overrides unbound field '{field}'")
            }
            Self::Content { step, block } => {
                write!(f, "step '{step}' references missing content block '{block}'")
            }
            Self::BannerTarget { banner, block } => {
                write!(f, "banner '{banner}' targets missing content block '{block}'")
            }
        }
    }
}

/// Every unresolved pointer in the document, in document order
#[must_use]
pub fn validate_references(doc: &ConfigDocument) -> Vec<DanglingReference> {
    let fields: HashSet<&FieldId> = doc.fields().ids().collect();
    let blocks: HashSet<&BlockId> = doc.detail_content().iter().map(|b| &b.id).collect();
    let mut dangling = Vec::new();

    if let Some(steps) = doc.steps().get() {
        for step in steps {
            for field in &step.field_ids {
                if !fields.contains(field) {
                    dangling.push(DanglingReference::Field {
                        step: step.id().clone(),
                        field: field.clone(),
                    });
                }
            }
            for field in step.field_overrides.keys() {
                if !step.binds(field) {
                    dangling.push(DanglingReference::Override {
                        step: step.id().clone(),
                        field: field.clone(),
                    });
                }
            }
            for block in [&step.content_id, &step.inserted_content_id].into_iter().flatten() {
                if !blocks.contains(block) {
                    dangling.push(DanglingReference::Content {
                        step: step.id().clone(),
                        block: block.clone(),
                    });
                }
            }
        }
    }

    for banner in doc.banners() {
        if let Some(block) = &banner.target_block_id {
            if !blocks.contains(block) {
                dangling.push(DanglingReference::BannerTarget {
                    banner: banner.id.clone(),
                    block: block.clone(),
                });
            }
        }
    }

    dangling
}

/// Document with every dangling pointer removed
///
/// Unresolved `fieldIds` entries and orphaned overrides are dropped,
/// unresolved content pointers and banner targets are cleared. Sections
/// without dangling pointers keep their allocation.
#[must_use]
pub fn repair_references(doc: &ConfigDocument) -> ConfigDocument {
    let dangling = validate_references(doc);
    if dangling.is_empty() {
        return doc.clone();
    }
    debug!(document = %doc.id(), count = dangling.len(), "Pruning dangling references");

    let fields: HashSet<&FieldId> = doc.fields().ids().collect();
    let blocks: HashSet<&BlockId> = doc.detail_content().iter().map(|b| &b.id).collect();
    let mut repaired = doc.clone();

    let steps_dangle = dangling
        .iter()
        .any(|d| !matches!(d, DanglingReference::BannerTarget { .. }));
    if steps_dangle {
        if let Some(steps) = doc.steps().get() {
            let pruned = steps
                .iter()
                .map(|step| prune_step(step, &fields, &blocks))
                .collect();
            repaired = repaired.with_steps(StepSequence::from_steps(pruned));
        }
    }

    if dangling
        .iter()
        .any(|d| matches!(d, DanglingReference::BannerTarget { .. }))
    {
        let banners = doc
            .banners()
            .iter()
            .cloned()
            .map(|mut banner| {
                if banner
                    .target_block_id
                    .as_ref()
                    .is_some_and(|b| !blocks.contains(b))
                {
                    banner.target_block_id = None;
                }
                banner
            })
            .collect();
        repaired = repaired.with_banners(banners);
    }

    repaired
}

fn prune_step(step: &Step, fields: &HashSet<&FieldId>, blocks: &HashSet<&BlockId>) -> Step {
    let mut step = step.clone();
    step.field_ids.retain(|f| fields.contains(f));
    let bound: HashSet<FieldId> = step.field_ids.iter().cloned().collect();
    step.field_overrides.retain(|f, _| bound.contains(f));
    for slot in [&mut step.content_id, &mut step.inserted_content_id] {
        if slot.as_ref().is_some_and(|b| !blocks.contains(b)) {
            *slot = None;
        }
    }
    step
}
