//! Typed document sections
//!
//! Each section models the keys the core reads or writes and keeps every
//! other key (style dictionaries, presentation toggles) in a flattened
//! `extra` map, so documents round-trip without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::FieldRegistry;
use crate::ids::{BannerId, BlockId};

fn yes() -> bool {
    true
}

/// Page identity and metadata, stored as root-level keys
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Browser tab title
    #[serde(default)]
    pub title: String,
    /// Favicon URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Social preview image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    /// Social preview title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    /// Social preview description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    /// Meta keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Naver site verification token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naver_verification: Option<String>,
    /// Google site verification token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_verification: Option<String>,
    /// Global font family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Page template, e.g. `standard` or `dynamic_step`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Layout mode, e.g. `mobile` or `full`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<String>,
}

impl Identity {
    /// Root keys owned by this section
    pub const KEYS: [&'static str; 11] = [
        "title",
        "favicon",
        "ogImage",
        "ogTitle",
        "ogDescription",
        "keywords",
        "naverVerification",
        "googleVerification",
        "font",
        "template",
        "layoutMode",
    ];
}

/// Colour scheme and fonts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Accent colour
    pub primary_color: String,
    /// Secondary colour
    pub secondary_color: String,
    /// Body font family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Header area of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    /// Whether the hero is rendered
    #[serde(default = "yes")]
    pub is_show: bool,
    /// Main heading
    #[serde(default)]
    pub headline: String,
    /// Sub heading
    #[serde(default)]
    pub sub_headline: String,
    /// Call-to-action label
    #[serde(default)]
    pub cta_text: String,
    /// Background image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Size preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Edge of the viewport a banner sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerPosition {
    /// Top edge
    Top,
    /// Bottom edge
    #[default]
    Bottom,
}

/// Floating banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingBanner {
    /// Banner identifier
    pub id: BannerId,
    /// Whether the banner is rendered
    #[serde(default = "yes")]
    pub is_show: bool,
    /// Banner text
    #[serde(default)]
    pub text: String,
    /// Background colour
    #[serde(default)]
    pub background_color: String,
    /// Text colour
    #[serde(default)]
    pub text_color: String,
    /// Viewport edge
    #[serde(default)]
    pub position: BannerPosition,
    /// Size preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Image shown instead of text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// External link target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Detail block scrolled to on click
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_block_id: Option<BlockId>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Lead form configuration, holding the canonical field pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    /// Form heading
    #[serde(default)]
    pub title: String,
    /// Form sub heading
    #[serde(default)]
    pub sub_title: String,
    /// Submit button label
    #[serde(default)]
    pub submit_button_text: String,
    /// Canonical field definitions
    #[serde(default)]
    pub fields: FieldRegistry,
    /// Show the privacy policy consent
    #[serde(default)]
    pub show_privacy_policy: bool,
    /// Show the terms consent
    #[serde(default)]
    pub show_terms: bool,
    /// Show the marketing consent
    #[serde(default)]
    pub show_marketing_consent: bool,
    /// Show the third-party consent
    #[serde(default)]
    pub show_third_party_consent: bool,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterSection {
    /// Whether the footer is rendered
    #[serde(default = "yes")]
    pub is_show: bool,
    /// Logo and certificate image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Copyright line
    #[serde(default)]
    pub copyright_text: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Navigation link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Link text
    #[serde(default)]
    pub label: String,
    /// Link target
    #[serde(default)]
    pub link: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Top navigation bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Whether the bar is rendered
    #[serde(default)]
    pub is_show: bool,
    /// Links
    #[serde(default)]
    pub items: Vec<NavigationItem>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Image gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GallerySection {
    /// Whether the gallery is rendered
    #[serde(default)]
    pub is_show: bool,
    /// Heading
    #[serde(default)]
    pub title: String,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Notice or FAQ entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItem {
    /// Entry identifier
    #[serde(default)]
    pub id: String,
    /// Entry title
    #[serde(default)]
    pub title: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Notice board or FAQ list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSection {
    /// Whether the board is rendered
    #[serde(default)]
    pub is_show: bool,
    /// Heading
    #[serde(default)]
    pub title: String,
    /// Entries
    #[serde(default)]
    pub items: Vec<BoardItem>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Business location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSection {
    /// Whether the section is rendered
    #[serde(default)]
    pub is_show: bool,
    /// Heading
    #[serde(default)]
    pub title: String,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// Render an embedded map
    #[serde(default)]
    pub show_map: bool,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Social network link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnsItem {
    /// Link identifier
    #[serde(default)]
    pub id: String,
    /// Network, e.g. `instagram`, `kakao`, `blog`
    #[serde(rename = "type", default)]
    pub network: String,
    /// Profile URL
    #[serde(default)]
    pub url: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Social link bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnsConfig {
    /// Whether the bar is rendered
    #[serde(default)]
    pub is_show: bool,
    /// Links
    #[serde(default)]
    pub items: Vec<SnsItem>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Feature card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureItem {
    /// Card identifier
    #[serde(default)]
    pub id: String,
    /// Card title
    #[serde(default)]
    pub title: String,
    /// Card text
    #[serde(default)]
    pub description: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Feature card block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSection {
    /// Whether the block is rendered
    #[serde(default)]
    pub is_show: bool,
    /// Heading
    #[serde(default)]
    pub title: String,
    /// Cards
    #[serde(default)]
    pub items: Vec<FeatureItem>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Floating chat button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatButtonConfig {
    /// Whether the button is rendered
    #[serde(default)]
    pub use_chat: bool,
    /// Channel, e.g. `kakao`, `tel`
    #[serde(rename = "type", default)]
    pub channel: String,
    /// Link opened on click
    #[serde(default)]
    pub link_url: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Popup slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupItem {
    /// Slide identifier
    #[serde(default)]
    pub id: String,
    /// Slide image
    #[serde(default)]
    pub image_url: String,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Entry popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
    /// Whether the popup opens
    #[serde(default)]
    pub use_popup: bool,
    /// Slides
    #[serde(default)]
    pub items: Vec<PopupItem>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ad-platform tracking ids
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelConfig {
    /// Meta pixel id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_pixel_id: Option<String>,
    /// Kakao pixel id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kakao_pixel_id: Option<String>,
    /// TikTok pixel id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok_pixel_id: Option<String>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hero_is_show_defaults_true() {
        let hero: HeroSection = serde_json::from_value(json!({"headline": "Hi"})).unwrap();
        assert!(hero.is_show);
        assert_eq!(hero.sub_headline, "");
    }

    #[test]
    fn theme_requires_colours() {
        let err = serde_json::from_value::<Theme>(json!({"primaryColor": "#000"}));
        assert!(err.is_err());
    }

    #[test]
    fn banner_keeps_styling_keys() {
        let json = json!({
            "id": "b1",
            "isShow": true,
            "text": "Call now",
            "backgroundColor": "#1e293b",
            "textColor": "#ffffff",
            "position": "top",
            "isSliding": true,
            "slideSpeed": 10
        });
        let banner: FloatingBanner = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(banner.position, BannerPosition::Top);
        assert_eq!(banner.extra.len(), 2);
        assert_eq!(serde_json::to_value(&banner).unwrap(), json);
    }

    #[test]
    fn identity_keys_match_wire_names() {
        let identity = Identity {
            title: "t".into(),
            favicon: Some(String::new()),
            og_image: Some(String::new()),
            og_title: Some(String::new()),
            og_description: Some(String::new()),
            keywords: Some(String::new()),
            naver_verification: Some(String::new()),
            google_verification: Some(String::new()),
            font: Some(String::new()),
            template: Some(String::new()),
            layout_mode: Some(String::new()),
        };
        let value = serde_json::to_value(identity).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, Identity::KEYS);
    }
}
