//! Step/field reference behaviour across independent edits

use pagecraft_model::{
    repair_references, validate_references, ConfigDocument, DanglingReference, Direction,
    FieldDraft, FieldId, FieldPatch, FieldType, SequentialIds, StepKind, StepSequence,
};
use pagecraft_tree::Node;
use proptest::prelude::*;
use serde_json::json;

fn base() -> ConfigDocument {
    ConfigDocument::from_node(&Node::from(json!({
        "id": "doc",
        "title": "t",
        "theme": {"primaryColor": "#000", "secondaryColor": "#fff"},
        "hero": {"headline": "h", "subHeadline": "s", "ctaText": "c"},
        "banners": [],
        "detailContent": [{"id": "d1", "type": "text", "content": "hi"}],
        "formConfig": {"title": "f", "subTitle": "", "submitButtonText": "go", "fields": []},
        "footer": {"isShow": true, "images": [], "copyrightText": ""}
    })))
    .unwrap()
}

/// Document with fields f1, f2 and steps s1 (form, binds f1) and s2 (outro)
fn bound() -> ConfigDocument {
    let doc = base();
    let mut ids = SequentialIds::new();
    let (fields, _) = doc
        .fields()
        .add(FieldDraft::new("Name", FieldType::ShortText).with_id("f1"), &mut ids)
        .unwrap();
    let (fields, _) = fields
        .add(FieldDraft::new("Phone", FieldType::Phone).with_id("f2"), &mut ids)
        .unwrap();
    let steps = StepSequence::from_steps(vec![
        pagecraft_model::Step::new("s1", StepKind::Form),
        pagecraft_model::Step::new("s2", StepKind::Outro),
    ])
    .bind_field(&"s1".into(), &"f1".into(), &fields)
    .unwrap();
    doc.with_fields(fields).with_steps(steps)
}

#[test]
fn clean_document_has_no_dangling_references() {
    assert!(validate_references(&bound()).is_empty());
}

#[test]
fn removing_bound_field_leaves_one_dangling_reference() {
    let doc = bound();
    let fields = doc.fields().remove(&"f1".into()).unwrap();
    let doc = doc.with_fields(fields);

    assert_eq!(
        validate_references(&doc),
        vec![DanglingReference::Field {
            step: "s1".into(),
            field: "f1".into()
        }]
    );
    assert_eq!(
        doc.steps().get().unwrap().get(&"s1".into()).unwrap().field_ids,
        vec![FieldId::from("f1")]
    );
}

#[test]
fn missing_content_and_banner_targets_are_reported() {
    let doc = bound()
        .set(&"steps.1.contentId".parse().unwrap(), Node::from("gone"))
        .unwrap()
        .set(
            &"banners.0".parse().unwrap(),
            Node::from(json!({"id": "b1", "text": "x", "targetBlockId": "nowhere"})),
        )
        .unwrap();
    let dangling = validate_references(&doc);
    assert!(dangling.contains(&DanglingReference::Content {
        step: "s2".into(),
        block: "gone".into()
    }));
    assert!(dangling.contains(&DanglingReference::BannerTarget {
        banner: "b1".into(),
        block: "nowhere".into()
    }));
}

#[test]
fn orphaned_override_is_reported() {
    let doc = bound()
        .set(&"steps.0.fieldOverrides.f2.label".parse().unwrap(), Node::from("X"))
        .unwrap();
    assert_eq!(
        validate_references(&doc),
        vec![DanglingReference::Override {
            step: "s1".into(),
            field: "f2".into()
        }]
    );
}

#[test]
fn repair_prunes_dangling_pointers() {
    let doc = bound();
    let doc = doc.with_fields(doc.fields().remove(&"f1".into()).unwrap());
    let repaired = repair_references(&doc);

    assert!(validate_references(&repaired).is_empty());
    assert!(repaired.steps().get().unwrap().steps()[0].field_ids.is_empty());
    assert!(repaired.shares_section(&doc, "formConfig"));
}

#[test]
fn repair_of_clean_document_shares_everything() {
    let doc = bound();
    let repaired = repair_references(&doc);
    assert!(repaired.shares_section(&doc, "steps"));
    assert!(repaired.shares_section(&doc, "banners"));
}

#[test]
fn override_is_visible_only_on_its_step() {
    let doc = bound();
    let fields = doc.fields();
    let steps = doc
        .steps()
        .get()
        .unwrap()
        .bind_field(&"s2".into(), &"f1".into(), fields)
        .unwrap()
        .override_field(&"s1".into(), &"f1".into(), &FieldPatch::label("X"))
        .unwrap();

    assert_eq!(fields.get(&"f1".into()).unwrap().label, "Name");
    assert_eq!(steps.effective_field(&"s1".into(), &"f1".into(), fields).unwrap().label, "X");
    assert_eq!(steps.effective_field(&"s2".into(), &"f1".into(), fields).unwrap().label, "Name");
}

proptest! {
    #[test]
    fn moves_never_change_step_bindings(moves in prop::collection::vec((0usize..4, any::<bool>()), 0..20)) {
        let doc = bound();
        let fields = doc.fields().clone();
        let mut ids = SequentialIds::new();
        let mut steps = doc.steps().get().unwrap().clone();
        let (next, s3) = steps.insert(StepKind::Intro, 0, &mut ids);
        steps = next.bind_field(&s3, &"f2".into(), &fields).unwrap();
        let (next, _) = steps.insert(StepKind::Content, 2, &mut ids);
        steps = next
            .override_field(&"s1".into(), &"f1".into(), &FieldPatch::label("X"))
            .unwrap();
        let before = steps.clone();

        for (index, up) in moves {
            let id = steps.steps()[index % steps.len()].id().clone();
            let direction = if up { Direction::Up } else { Direction::Down };
            steps = steps.move_step(&id, direction).unwrap().0;
        }

        prop_assert_eq!(steps.len(), before.len());
        for step in before.iter() {
            let moved = steps.get(step.id()).unwrap();
            prop_assert_eq!(&moved.field_ids, &step.field_ids);
            prop_assert_eq!(&moved.field_overrides, &step.field_overrides);
            prop_assert_eq!(moved.kind(), step.kind());
        }
    }
}
