//! Document editing, sharing and round-trip behaviour

use pagecraft_model::{ConfigDocument, DocumentError, Slot, StepKind};
use pagecraft_tree::{DocPath, Node, PathError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample() -> ConfigDocument {
    ConfigDocument::from_node(&Node::from(json!({
        "id": "landing-1",
        "title": "Spring promo",
        "favicon": "https://cdn.example/icon.png",
        "theme": {"primaryColor": "#0ea5e9", "secondaryColor": "#0f172a"},
        "hero": {
            "isShow": true,
            "headline": "Hello",
            "subHeadline": "World",
            "ctaText": "Apply",
            "headlineStyle": {"color": "#ffffff", "fontSize": "2rem"}
        },
        "banners": [{
            "id": "b1", "isShow": true, "text": "Call now",
            "backgroundColor": "#1e293b", "textColor": "#ffffff", "position": "bottom"
        }],
        "detailContent": [{"id": "d1", "type": "image", "content": "https://cdn.example/1.png"}],
        "formConfig": {
            "title": "Apply",
            "subTitle": "",
            "submitButtonText": "Send",
            "fields": [
                {"id": "f1", "label": "Name", "type": "text", "required": true},
                {"id": "f2", "label": "Plan", "type": "select", "required": false,
                 "options": [{"value": "a", "label": "A"}]}
            ],
            "showPrivacyPolicy": true,
            "style": {"borderRadius": "12px"}
        },
        "footer": {"isShow": true, "images": [], "copyrightText": "(c) Example"},
        "navigation": null,
        "gallery": {"isShow": true, "title": "Gallery", "images": ["g1.png"]},
        "steps": [
            {"id": "s1", "type": "form", "fieldIds": ["f1"]},
            {"id": "s2", "type": "outro", "contentId": "d1"}
        ],
        "customScript": {"head": "<meta>"}
    })))
    .unwrap()
}

fn path(s: &str) -> DocPath {
    s.parse().unwrap()
}

#[test]
fn round_trip_through_json_is_lossless() {
    let doc = sample();
    let text = doc.to_json().unwrap();
    let back = ConfigDocument::from_json(&text).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.to_node().unwrap().to_value(), doc.to_node().unwrap().to_value());
}

#[test]
fn unknown_keys_survive_round_trip() {
    let value = sample().to_node().unwrap().to_value();
    assert_eq!(value["customScript"], json!({"head": "<meta>"}));
    assert_eq!(value["hero"]["headlineStyle"]["fontSize"], json!("2rem"));
    assert_eq!(value["formConfig"]["style"], json!({"borderRadius": "12px"}));
}

#[test]
fn optional_sections_serialize_explicitly() {
    let value = sample().to_node().unwrap().to_value();
    assert_eq!(value["navigation"], json!(null));
    assert_eq!(value["board"], json!(null));
    assert!(value["gallery"].is_object());
}

#[test]
fn set_nested_style_shares_other_sections() {
    let doc = sample();
    let next = doc
        .set(&path("hero.headlineStyle.color"), Node::from("#000000"))
        .unwrap();

    assert_eq!(
        next.hero().extra["headlineStyle"]["color"],
        json!("#000000")
    );
    assert_eq!(doc.hero().extra["headlineStyle"]["color"], json!("#ffffff"));
    assert!(!next.shares_section(&doc, "hero"));
    for key in ["theme", "banners", "detailContent", "formConfig", "footer", "gallery", "steps", "title"] {
        assert!(next.shares_section(&doc, key), "{key} was rebuilt");
    }
}

#[test]
fn set_identity_key_at_root() {
    let next = sample().set(&path("title"), Node::from("Summer promo")).unwrap();
    assert_eq!(next.identity().title, "Summer promo");
    assert_eq!(next.identity().favicon.as_deref(), Some("https://cdn.example/icon.png"));
}

#[test]
fn set_creates_optional_section() {
    let next = sample()
        .set(&path("location.address"), Node::from("1 Main St"))
        .unwrap();
    let location = next.location().get().unwrap();
    assert_eq!(location.address, "1 Main St");
    assert!(!location.is_show);
}

#[test]
fn set_null_switches_optional_section_off() {
    let next = sample().set(&path("gallery"), Node::Null).unwrap();
    assert_eq!(next.gallery(), &Slot::NotConfigured);
}

#[test]
fn set_unknown_root_key_is_kept() {
    let next = sample().set(&path("analytics.tagId"), Node::from("G-1")).unwrap();
    assert_eq!(next.extra()["analytics"], json!({"tagId": "G-1"}));
}

#[test]
fn set_empty_path_is_invalid() {
    let err = sample().set(&DocPath::root(), Node::Null).unwrap_err();
    assert!(matches!(err, DocumentError::Path(PathError::EmptyPath)));
}

#[test]
fn id_is_immutable() {
    let err = sample().set(&path("id"), Node::from("other")).unwrap_err();
    assert!(matches!(err, DocumentError::ImmutableId));
}

#[test]
fn step_kind_cannot_change() {
    let err = sample().set(&path("steps.0.type"), Node::from("intro")).unwrap_err();
    assert!(matches!(err, DocumentError::StepKindChanged(id) if id == "s1"));
}

#[test]
fn step_title_edit_keeps_kind() {
    let next = sample().set(&path("steps.1.title"), Node::from("Thanks")).unwrap();
    let steps = next.steps().get().unwrap();
    assert_eq!(steps.steps()[1].title.as_deref(), Some("Thanks"));
    assert_eq!(steps.steps()[1].kind(), StepKind::Outro);
}

#[test]
fn type_violation_is_reported_per_section() {
    let err = sample().set(&path("theme.primaryColor"), Node::from(5_i64)).unwrap_err();
    assert!(matches!(err, DocumentError::InvalidValue { section, .. } if section == "theme"));
}

#[test]
fn get_reads_plain_representation() {
    let doc = sample();
    let color = doc.get(&path("theme.primaryColor")).unwrap();
    assert_eq!(color.as_ref().and_then(Node::as_str), Some("#0ea5e9"));
    assert_eq!(doc.get(&path("board.items")).unwrap(), None);
}

#[test]
fn edits_cannot_duplicate_ids() {
    let doc = sample();

    let err = doc.set(&path("formConfig.fields.1.id"), Node::from("f1")).unwrap_err();
    assert!(matches!(err, DocumentError::DuplicateId { ref section, ref id } if section == "formConfig" && id == "f1"));
    assert_eq!(doc.fields().ids().map(|id| id.as_str()).collect::<Vec<_>>(), ["f1", "f2"]);

    let err = doc.set(&path("steps.1.id"), Node::from("s1")).unwrap_err();
    assert!(matches!(err, DocumentError::DuplicateId { ref section, .. } if section == "steps"));

    let copy = json!({"id": "d1", "type": "image", "content": "https://cdn.example/2.png"});
    let err = doc.set(&path("detailContent.1"), Node::from(copy)).unwrap_err();
    assert!(matches!(err, DocumentError::DuplicateId { ref id, .. } if id == "d1"));

    let err = doc
        .set(&path("banners"), Node::from(json!([{"id": "b1"}, {"id": "b1"}])))
        .unwrap_err();
    assert!(matches!(err, DocumentError::DuplicateId { ref section, .. } if section == "banners"));
}

#[test]
fn edits_keeping_ids_unique_succeed() {
    let next = sample().set(&path("formConfig.fields.1.id"), Node::from("f3")).unwrap();
    assert_eq!(next.fields().ids().map(|id| id.as_str()).collect::<Vec<_>>(), ["f1", "f3"]);
}
