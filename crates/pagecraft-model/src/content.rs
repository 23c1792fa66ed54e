//! Detail-content blocks
//!
//! Blocks are the rich-media body of a page. Steps and banners point at them
//! by [`BlockId`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::BlockId;

/// Tag of a detail-content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Image URL
    Image,
    /// YouTube URL
    Youtube,
    /// Uploaded video URL
    Video,
    /// Street address rendered as a map
    Map,
    /// Styled text banner
    Banner,
    /// Feature grid
    Features,
    /// Plain text
    Text,
}

/// Whether a media URL points at YouTube
#[must_use]
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtu")
}

/// One block of the detail content list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailContentBlock {
    /// Block identifier
    pub id: BlockId,
    /// Block tag
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// URL, address or text, read according to `kind`
    #[serde(default)]
    pub content: String,
    /// Player size for video blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_size: Option<String>,
    /// Autoplay for video blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_play: Option<bool>,
    /// Place label for map blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_place_name: Option<String>,
    /// Map size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_size: Option<String>,
    /// Style of banner blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_style: Option<Value>,
    /// Countdown settings of banner blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_config: Option<Value>,
    /// Rendered width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed view of a block, by tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockPayload<'a> {
    /// Image
    Image {
        /// Image URL
        url: &'a str,
    },
    /// Embedded YouTube player
    Youtube {
        /// Video URL
        url: &'a str,
        /// Player size
        size: Option<&'a str>,
        /// Start playing on load
        auto_play: bool,
    },
    /// Uploaded video
    Video {
        /// Video URL
        url: &'a str,
        /// Start playing on load
        auto_play: bool,
    },
    /// Map
    Map {
        /// Street address
        address: &'a str,
        /// Label shown on the pin
        place_name: Option<&'a str>,
        /// Map size
        size: Option<&'a str>,
    },
    /// Text banner
    Banner {
        /// Banner text
        text: &'a str,
        /// Style dictionary
        style: Option<&'a Value>,
        /// Countdown settings
        urgency: Option<&'a Value>,
    },
    /// Feature grid
    Features {
        /// Heading
        heading: &'a str,
        /// Grid entries
        items: Option<&'a Value>,
    },
    /// Plain text
    Text {
        /// Body text
        body: &'a str,
    },
}

impl DetailContentBlock {
    /// Block of `kind` with the given content
    #[must_use]
    pub fn new(id: impl Into<BlockId>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            video_size: None,
            auto_play: None,
            map_place_name: None,
            map_size: None,
            banner_style: None,
            urgency_config: None,
            width: None,
            extra: Map::new(),
        }
    }

    /// Media block for a URL: YouTube links become [`BlockKind::Youtube`],
    /// anything else an image
    #[must_use]
    pub fn media(id: impl Into<BlockId>, url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = if is_youtube_url(&url) {
            BlockKind::Youtube
        } else {
            BlockKind::Image
        };
        Self::new(id, kind, url)
    }

    /// Typed view of the content
    #[must_use]
    pub fn payload(&self) -> BlockPayload<'_> {
        let content = self.content.as_str();
        match self.kind {
            BlockKind::Image => BlockPayload::Image { url: content },
            BlockKind::Youtube => BlockPayload::Youtube {
                url: content,
                size: self.video_size.as_deref(),
                auto_play: self.auto_play.unwrap_or(false),
            },
            BlockKind::Video => BlockPayload::Video {
                url: content,
                auto_play: self.auto_play.unwrap_or(false),
            },
            BlockKind::Map => BlockPayload::Map {
                address: content,
                place_name: self.map_place_name.as_deref(),
                size: self.map_size.as_deref(),
            },
            BlockKind::Banner => BlockPayload::Banner {
                text: content,
                style: self.banner_style.as_ref(),
                urgency: self.urgency_config.as_ref(),
            },
            BlockKind::Features => BlockPayload::Features {
                heading: content,
                items: self.extra.get("items"),
            },
            BlockKind::Text => BlockPayload::Text { body: content },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_detects_youtube() {
        assert_eq!(
            DetailContentBlock::media("b1", "https://youtu.be/abc").kind,
            BlockKind::Youtube
        );
        assert_eq!(
            DetailContentBlock::media("b2", "https://cdn.example/a.png").kind,
            BlockKind::Image
        );
    }

    #[test]
    fn payload_by_kind() {
        let block: DetailContentBlock = serde_json::from_value(json!({
            "id": "m1",
            "type": "map",
            "content": "1 Main St",
            "mapPlaceName": "Office"
        }))
        .unwrap();
        assert_eq!(
            block.payload(),
            BlockPayload::Map {
                address: "1 Main St",
                place_name: Some("Office"),
                size: None
            }
        );
    }

    #[test]
    fn banner_style_survives_round_trip() {
        let json = json!({
            "id": "b1",
            "type": "banner",
            "content": "Sale",
            "bannerStyle": {"height": "300px", "textAlign": "center"},
            "anchor": "promo"
        });
        let block: DetailContentBlock = serde_json::from_value(json.clone()).unwrap();
        assert!(matches!(block.payload(), BlockPayload::Banner { style: Some(_), .. }));
        assert_eq!(serde_json::to_value(&block).unwrap(), json);
    }
}
