//! Shape migrations
//!
//! Each migration rewrites one historical shape into the current one. All
//! of them are pure and idempotent, and return the input allocation when
//! there is nothing to do, which is how the migrator detects which ones
//! actually ran.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use pagecraft_model::{is_youtube_url, FieldType};
use pagecraft_tree::{DocPath, Node};

use crate::error::MigrationError;

/// Pure transform from an older or partial document shape to the current one
pub trait Migration: Send + Sync + Debug {
    /// Stable identifier, used in logs and reports
    fn name(&self) -> &'static str;

    /// Rewrite the document
    ///
    /// # Errors
    /// Returns error if the document cannot be reconciled
    fn apply(&self, doc: &Node) -> Result<Node, MigrationError>;
}

/// Migrations in the order the migrator runs them
#[must_use]
pub fn standard_migrations() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(LegacyBannerToList),
        Box::new(DetailImagesToBlocks),
        Box::new(SnsLegacyLinksToItems),
        Box::new(InitializeSectionItems),
        Box::new(AssignMissingIds),
        Box::new(BannerDefaults),
        Box::new(CoerceFieldTypes),
    ]
}

fn non_empty_str<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
    node.get_key(key)
        .and_then(Node::as_str)
        .filter(|s| !s.is_empty())
}

/// First of `base`, `base_2`, `base_3`, ... not in `taken`
fn unique_id(base: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn replace_array(doc: &Node, path: &DocPath, items: Vec<Node>) -> Result<Node, MigrationError> {
    Ok(pagecraft_tree::set(doc, path, Node::Array(Arc::new(items)))?)
}

/// Single `banner` object becomes the `banners` list
///
/// The lone banner is kept only when the list is absent or empty; it gets
/// the id `legacy_banner` if it has none. The `banner` key is always
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyBannerToList;

impl Migration for LegacyBannerToList {
    fn name(&self) -> &'static str {
        "legacy-banner-to-list"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let Some(banner) = doc.get_key("banner") else {
            return Ok(doc.clone());
        };
        let mut next = doc.without_member("banner");

        let has_list = doc
            .get_key("banners")
            .and_then(Node::as_array)
            .is_some_and(|banners| !banners.is_empty());
        if !has_list && banner.is_object() {
            let entry = if non_empty_str(banner, "id").is_some() {
                banner.clone()
            } else {
                banner.with_member("id", Node::from("legacy_banner"))
            };
            next = next.with_member("banners", Node::array([entry]));
        }
        Ok(next)
    }
}

/// `detailImages` URL list becomes `detailContent` blocks
///
/// YouTube URLs become `youtube` blocks, anything else `image` blocks.
/// New blocks are appended after existing ones with ids `detail_<n>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailImagesToBlocks;

impl Migration for DetailImagesToBlocks {
    fn name(&self) -> &'static str {
        "detail-images-to-blocks"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let Some(images) = doc.get_key("detailImages") else {
            return Ok(doc.clone());
        };
        let next = doc.without_member("detailImages");

        let urls: Vec<&str> = images
            .as_array()
            .unwrap_or_default()
            .iter()
            .filter_map(Node::as_str)
            .filter(|url| !url.is_empty())
            .collect();
        if urls.is_empty() {
            return Ok(next);
        }

        let mut blocks: Vec<Node> = doc
            .get_key("detailContent")
            .and_then(Node::as_array)
            .map(<[Node]>::to_vec)
            .unwrap_or_default();
        let mut taken: HashSet<String> = blocks
            .iter()
            .filter_map(|b| non_empty_str(b, "id"))
            .map(str::to_string)
            .collect();

        for (index, url) in urls.into_iter().enumerate() {
            let id = unique_id(format!("detail_{index}"), &taken);
            taken.insert(id.clone());
            let kind = if is_youtube_url(url) { "youtube" } else { "image" };
            blocks.push(Node::object([
                ("id", Node::from(id)),
                ("type", Node::from(kind)),
                ("content", Node::from(url)),
            ]));
        }
        replace_array(&next, &DocPath::key("detailContent"), blocks)
    }
}

/// Flat social links in `snsConfig` become `snsConfig.items`
#[derive(Debug, Clone, Copy, Default)]
pub struct SnsLegacyLinksToItems;

impl SnsLegacyLinksToItems {
    /// Legacy key and the network name it maps to
    const LEGACY_KEYS: [(&'static str, &'static str); 4] = [
        ("kakao", "kakao"),
        ("naverBlog", "blog"),
        ("instagram", "instagram"),
        ("youtube", "youtube"),
    ];
}

impl Migration for SnsLegacyLinksToItems {
    fn name(&self) -> &'static str {
        "sns-legacy-links-to-items"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let Some(sns) = doc.get_key("snsConfig").filter(|s| s.is_object()) else {
            return Ok(doc.clone());
        };
        if !Self::LEGACY_KEYS
            .iter()
            .any(|(key, _)| sns.get_key(key).is_some())
        {
            return Ok(doc.clone());
        }

        let mut items: Vec<Node> = sns
            .get_key("items")
            .and_then(Node::as_array)
            .map(<[Node]>::to_vec)
            .unwrap_or_default();
        let mut next_sns = sns.clone();

        for (key, network) in Self::LEGACY_KEYS {
            if let Some(url) = non_empty_str(sns, key) {
                let already = items.iter().any(|item| {
                    non_empty_str(item, "type") == Some(network) && non_empty_str(item, "url") == Some(url)
                });
                if !already {
                    items.push(Node::object([
                        ("id", Node::from(format!("sns_{network}"))),
                        ("type", Node::from(network)),
                        ("url", Node::from(url)),
                    ]));
                }
            }
            next_sns = next_sns.without_member(key);
        }

        let next_sns = next_sns.with_member("items", Node::Array(Arc::new(items)));
        Ok(doc.with_member("snsConfig", next_sns))
    }
}

/// Present optional sections get an empty list where theirs is missing
#[derive(Debug, Clone, Copy, Default)]
pub struct InitializeSectionItems;

impl InitializeSectionItems {
    /// Section key and the list it must carry
    const LISTS: [(&'static str, &'static str); 6] = [
        ("navigation", "items"),
        ("board", "items"),
        ("snsConfig", "items"),
        ("features", "items"),
        ("popupConfig", "items"),
        ("gallery", "images"),
    ];
}

impl Migration for InitializeSectionItems {
    fn name(&self) -> &'static str {
        "initialize-section-items"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let mut next = doc.clone();
        for (section, list) in Self::LISTS {
            let Some(node) = doc.get_key(section).filter(|s| s.is_object()) else {
                continue;
            };
            if node.get_key(list).map_or(true, Node::is_null) {
                next = pagecraft_tree::set(&next, &DocPath::key(section).child(list), Node::empty_array())?;
            }
        }
        Ok(next)
    }
}

/// Entities without an id, or with one already used in their collection,
/// get `<prefix>_<index>`
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignMissingIds;

impl AssignMissingIds {
    /// Collection path and id prefix
    const COLLECTIONS: [(&'static str, &'static str); 4] = [
        ("banners", "banner"),
        ("detailContent", "detail"),
        ("formConfig.fields", "field"),
        ("steps", "step"),
    ];
}

impl Migration for AssignMissingIds {
    fn name(&self) -> &'static str {
        "assign-missing-ids"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let mut next = doc.clone();
        for (collection, prefix) in Self::COLLECTIONS {
            let path: DocPath = collection.parse()?;
            let Some(items) = pagecraft_tree::get(doc, &path).and_then(Node::as_array) else {
                continue;
            };

            let mut taken: HashSet<String> = items
                .iter()
                .filter_map(|item| non_empty_str(item, "id"))
                .map(str::to_string)
                .collect();
            let mut seen = HashSet::new();
            let mut changed = false;
            let mut rewritten = Vec::with_capacity(items.len());

            for (index, item) in items.iter().enumerate() {
                let fresh = match non_empty_str(item, "id") {
                    Some(id) if seen.insert(id.to_string()) => None,
                    _ if item.is_object() => Some(unique_id(format!("{prefix}_{index}"), &taken)),
                    _ => None,
                };
                match fresh {
                    Some(id) => {
                        taken.insert(id.clone());
                        seen.insert(id.clone());
                        rewritten.push(item.with_member("id", Node::from(id)));
                        changed = true;
                    }
                    None => rewritten.push(item.clone()),
                }
            }

            if changed {
                next = replace_array(&next, &path, rewritten)?;
            }
        }
        Ok(next)
    }
}

/// Banners get the standard look for any key they lack
#[derive(Debug, Clone, Copy, Default)]
pub struct BannerDefaults;

impl BannerDefaults {
    fn defaults() -> Node {
        Node::object([
            ("isShow", Node::from(true)),
            ("text", Node::from("")),
            ("backgroundColor", Node::from("#1e293b")),
            ("textColor", Node::from("#ffffff")),
            ("position", Node::from("bottom")),
            ("size", Node::from("md")),
        ])
    }
}

impl Migration for BannerDefaults {
    fn name(&self) -> &'static str {
        "banner-defaults"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let Some(banners) = doc.get_key("banners").and_then(Node::as_array) else {
            return Ok(doc.clone());
        };
        let defaults = Self::defaults();
        let filled: Vec<Node> = banners
            .iter()
            .map(|banner| {
                if banner.is_object() {
                    crate::merge::fill_missing(banner, &defaults)
                } else {
                    banner.clone()
                }
            })
            .collect();
        if filled.iter().zip(banners).all(|(a, b)| a.same_ref(b)) {
            return Ok(doc.clone());
        }
        replace_array(doc, &DocPath::key("banners"), filled)
    }
}

/// Form fields get a known type, a label, a required flag and well-formed options
///
/// Unknown types fall back to `text`. Options on types that cannot carry
/// them are dropped; bare string options become `{value, label}` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoerceFieldTypes;

impl CoerceFieldTypes {
    fn coerce(field: &Node) -> Node {
        if !field.is_object() {
            return field.clone();
        }
        let mut next = field.clone();

        let field_type = match field.get_key("type").and_then(Node::as_str).and_then(FieldType::from_wire) {
            Some(known) => known,
            None => {
                next = next.with_member("type", Node::from(FieldType::ShortText.as_str()));
                FieldType::ShortText
            }
        };
        if field.get_key("label").map_or(true, |l| l.as_str().is_none()) {
            next = next.with_member("label", Node::from(""));
        }
        if field.get_key("required").map_or(true, |r| r.as_bool().is_none()) {
            next = next.with_member("required", Node::from(false));
        }

        match field.get_key("options") {
            None => {}
            Some(_) if !field_type.supports_options() => next = next.without_member("options"),
            Some(Node::Array(options)) => {
                if options.iter().any(|o| o.as_str().is_some()) {
                    let normalized = options
                        .iter()
                        .map(|option| match option.as_str() {
                            Some(text) => Node::object([("value", Node::from(text)), ("label", Node::from(text))]),
                            None => option.clone(),
                        })
                        .collect::<Vec<_>>();
                    next = next.with_member("options", Node::Array(Arc::new(normalized)));
                }
            }
            Some(_) => next = next.with_member("options", Node::empty_array()),
        }
        next
    }
}

impl Migration for CoerceFieldTypes {
    fn name(&self) -> &'static str {
        "coerce-field-types"
    }

    fn apply(&self, doc: &Node) -> Result<Node, MigrationError> {
        let path: DocPath = "formConfig.fields".parse()?;
        let Some(fields) = pagecraft_tree::get(doc, &path).and_then(Node::as_array) else {
            return Ok(doc.clone());
        };
        let coerced: Vec<Node> = fields.iter().map(Self::coerce).collect();
        if coerced.iter().zip(fields).all(|(a, b)| a.same_ref(b)) {
            return Ok(doc.clone());
        }
        replace_array(doc, &path, coerced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(migration: &dyn Migration, value: serde_json::Value) -> serde_json::Value {
        migration.apply(&Node::from(value)).unwrap().to_value()
    }

    fn assert_idempotent(migration: &dyn Migration, value: serde_json::Value) {
        let once = migration.apply(&Node::from(value)).unwrap();
        let twice = migration.apply(&once).unwrap();
        assert!(twice.same_ref(&once), "{} is not idempotent", migration.name());
    }

    #[test]
    fn lone_banner_becomes_list() {
        let out = run(&LegacyBannerToList, json!({"banner": {"text": "hi"}}));
        assert_eq!(out, json!({"banners": [{"text": "hi", "id": "legacy_banner"}]}));
    }

    #[test]
    fn lone_banner_dropped_when_list_exists() {
        let out = run(
            &LegacyBannerToList,
            json!({"banner": {"text": "old"}, "banners": [{"id": "b1", "text": "new"}]}),
        );
        assert_eq!(out, json!({"banners": [{"id": "b1", "text": "new"}]}));
    }

    #[test]
    fn lone_banner_keeps_own_id() {
        let out = run(&LegacyBannerToList, json!({"banner": {"id": "top", "text": "hi"}, "banners": []}));
        assert_eq!(out["banners"][0]["id"], json!("top"));
    }

    #[test]
    fn detail_images_become_blocks() {
        let out = run(
            &DetailImagesToBlocks,
            json!({
                "detailImages": ["a.png", "", "https://youtu.be/x"],
                "detailContent": [{"id": "detail_0", "type": "text", "content": "keep"}]
            }),
        );
        assert_eq!(
            out,
            json!({
                "detailContent": [
                    {"id": "detail_0", "type": "text", "content": "keep"},
                    {"id": "detail_0_2", "type": "image", "content": "a.png"},
                    {"id": "detail_1", "type": "youtube", "content": "https://youtu.be/x"}
                ]
            })
        );
    }

    #[test]
    fn empty_detail_images_just_removed() {
        let out = run(&DetailImagesToBlocks, json!({"detailImages": []}));
        assert_eq!(out, json!({}));
    }

    #[test]
    fn sns_flat_links_become_items() {
        let out = run(
            &SnsLegacyLinksToItems,
            json!({"snsConfig": {"isShow": true, "kakao": "https://pf.kakao.com/x", "naverBlog": ""}}),
        );
        assert_eq!(
            out,
            json!({"snsConfig": {
                "isShow": true,
                "items": [{"id": "sns_kakao", "type": "kakao", "url": "https://pf.kakao.com/x"}]
            }})
        );
    }

    #[test]
    fn sns_existing_item_not_duplicated() {
        let out = run(
            &SnsLegacyLinksToItems,
            json!({"snsConfig": {
                "instagram": "https://instagram.com/x",
                "items": [{"id": "i1", "type": "instagram", "url": "https://instagram.com/x"}]
            }}),
        );
        assert_eq!(out["snsConfig"]["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn present_sections_get_lists() {
        let out = run(
            &InitializeSectionItems,
            json!({"navigation": {"isShow": true}, "gallery": {"images": null}, "board": null}),
        );
        assert_eq!(
            out,
            json!({"navigation": {"isShow": true, "items": []}, "gallery": {"images": []}, "board": null})
        );
    }

    #[test]
    fn ids_assigned_and_deduplicated() {
        let out = run(
            &AssignMissingIds,
            json!({
                "banners": [{"text": "a"}, {"id": "x"}, {"id": "x"}],
                "formConfig": {"fields": [{"label": "n"}]}
            }),
        );
        assert_eq!(out["banners"][0]["id"], json!("banner_0"));
        assert_eq!(out["banners"][1]["id"], json!("x"));
        assert_eq!(out["banners"][2]["id"], json!("banner_2"));
        assert_eq!(out["formConfig"]["fields"][0]["id"], json!("field_0"));
    }

    #[test]
    fn banner_gets_default_look() {
        let out = run(&BannerDefaults, json!({"banners": [{"id": "b", "text": "hi", "position": "top"}]}));
        assert_eq!(
            out["banners"][0],
            json!({
                "id": "b", "text": "hi", "position": "top", "isShow": true,
                "backgroundColor": "#1e293b", "textColor": "#ffffff", "size": "md"
            })
        );
    }

    #[test]
    fn field_types_coerced() {
        let out = run(
            &CoerceFieldTypes,
            json!({"formConfig": {"fields": [
                {"id": "a", "label": "A", "type": "slider", "required": true, "options": ["x"]},
                {"id": "b", "label": null, "type": "radio", "options": ["yes", {"value": "n", "label": "No"}]}
            ]}}),
        );
        assert_eq!(
            out["formConfig"]["fields"],
            json!([
                {"id": "a", "label": "A", "type": "text", "required": true},
                {"id": "b", "label": "", "type": "radio", "required": false, "options": [
                    {"value": "yes", "label": "yes"}, {"value": "n", "label": "No"}
                ]}
            ])
        );
    }

    #[test]
    fn every_migration_is_idempotent() {
        let raw = json!({
            "banner": {"text": "hi"},
            "detailImages": ["a.png"],
            "snsConfig": {"youtube": "https://youtube.com/@x"},
            "navigation": {},
            "banners": [],
            "formConfig": {"fields": [{"type": "bogus", "options": ["a"]}]},
            "steps": [{"type": "intro"}]
        });
        for migration in standard_migrations() {
            assert_idempotent(migration.as_ref(), raw.clone());
        }
    }

    #[test]
    fn untouched_document_is_same_allocation() {
        let doc = Node::from(json!({"title": "x"}));
        for migration in standard_migrations() {
            assert!(migration.apply(&doc).unwrap().same_ref(&doc), "{}", migration.name());
        }
    }
}
