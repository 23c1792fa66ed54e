//! Canonical default document
//!
//! Source of every required section that a raw document lacks.

use pagecraft_model::{
    ConfigDocument, FieldDefinition, FieldId, FieldRegistry, FieldType, FooterSection,
    FormSection, HeroSection, Identity, Theme,
};
use serde_json::{json, Map, Value};

/// Default accent colour
pub const DEFAULT_PRIMARY_COLOR: &str = "#0ea5e9";

/// Default secondary colour
pub const DEFAULT_SECONDARY_COLOR: &str = "#0f172a";

fn style(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn field(id: &str, label: &str, field_type: FieldType) -> FieldDefinition {
    FieldDefinition {
        id: FieldId::new(id),
        label: label.to_string(),
        field_type,
        required: true,
        placeholder: None,
        options: Vec::new(),
        time_config: None,
        extra: Map::new(),
    }
}

/// Fresh document with placeholder copy in every required section
#[must_use]
pub fn default_document(id: &str) -> ConfigDocument {
    let identity = Identity {
        favicon: Some(String::new()),
        og_image: Some(String::new()),
        og_title: Some(String::new()),
        og_description: Some(String::new()),
        keywords: Some(String::new()),
        ..Identity::default()
    };

    let theme = Theme {
        primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
        secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
        font_family: None,
        extra: Map::new(),
    };

    let hero = HeroSection {
        is_show: true,
        headline: "Enter your main headline".to_string(),
        sub_headline: "Enter your sub headline".to_string(),
        cta_text: "Apply now".to_string(),
        background_image: Some("https://picsum.photos/1920/1080".to_string()),
        size: Some("md".to_string()),
        extra: style(json!({
            "headlineStyle": {
                "fontSize": "3rem", "fontWeight": "800", "color": "#ffffff", "textAlign": "center"
            },
            "subHeadlineStyle": {
                "fontSize": "1.25rem", "fontWeight": "400", "color": "#d1d5db", "textAlign": "center"
            }
        })),
    };

    let form_config = FormSection {
        title: "Free consultation".to_string(),
        sub_title: String::new(),
        submit_button_text: "Apply now".to_string(),
        fields: FieldRegistry::from_fields(vec![
            field("name", "Name", FieldType::ShortText),
            field("phone", "Phone", FieldType::Phone),
        ]),
        show_privacy_policy: true,
        show_terms: false,
        show_marketing_consent: false,
        show_third_party_consent: false,
        extra: style(json!({
            "submitSuccessTitle": "Your request has been received!",
            "submitSuccessMessage": "We will review your details and get back to you shortly.",
            "position": "bottom",
            "layout": "vertical",
            "style": {
                "backgroundColor": "#ffffff", "borderRadius": "16px",
                "borderColor": "#e5e7eb", "borderWidth": "1px"
            }
        })),
    };

    let footer = FooterSection {
        is_show: true,
        images: Vec::new(),
        copyright_text: "\u{a9} 2025 Company Name. All Rights Reserved.".to_string(),
        extra: style(json!({
            "copyrightStyle": {
                "fontSize": "0.75rem", "fontWeight": "400", "color": "#9ca3af", "textAlign": "center"
            }
        })),
    };

    ConfigDocument::new(id, identity, theme, hero, form_config, footer)
}
