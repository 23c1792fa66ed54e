//! The page configuration document
//!
//! [`ConfigDocument`] owns every section behind an [`Arc`]. Edits produce a
//! new document in which only the touched section is rebuilt; all other
//! sections are shared with the previous version.

use std::collections::HashSet;
use std::sync::Arc;

use pagecraft_tree::{DocPath, Node, PathError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::DetailContentBlock;
use crate::error::DocumentError;
use crate::field::FieldRegistry;
use crate::ids::DocumentId;
use crate::sections::{
    BoardSection, ChatButtonConfig, FeatureSection, FloatingBanner, FooterSection, FormSection,
    GallerySection, HeroSection, Identity, LocationSection, NavigationConfig, PixelConfig,
    PopupConfig, SnsConfig, Theme,
};
use crate::slot::Slot;
use crate::step::StepSequence;

/// Root keys of sections that must always be present
pub const REQUIRED_SECTIONS: [&str; 6] = [
    "theme",
    "hero",
    "banners",
    "detailContent",
    "formConfig",
    "footer",
];

/// Root keys of sections that may be switched off
pub const OPTIONAL_SECTIONS: [&str; 10] = [
    "navigation",
    "gallery",
    "board",
    "location",
    "snsConfig",
    "features",
    "chatConfig",
    "popupConfig",
    "pixelConfig",
    "steps",
];

/// Full page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    id: DocumentId,
    #[serde(flatten)]
    identity: Arc<Identity>,
    theme: Arc<Theme>,
    hero: Arc<HeroSection>,
    banners: Arc<Vec<FloatingBanner>>,
    detail_content: Arc<Vec<DetailContentBlock>>,
    form_config: Arc<FormSection>,
    footer: Arc<FooterSection>,
    #[serde(default)]
    navigation: Slot<NavigationConfig>,
    #[serde(default)]
    gallery: Slot<GallerySection>,
    #[serde(default)]
    board: Slot<BoardSection>,
    #[serde(default)]
    location: Slot<LocationSection>,
    #[serde(default)]
    sns_config: Slot<SnsConfig>,
    #[serde(default)]
    features: Slot<FeatureSection>,
    #[serde(default)]
    chat_config: Slot<ChatButtonConfig>,
    #[serde(default)]
    popup_config: Slot<PopupConfig>,
    #[serde(default)]
    pixel_config: Slot<PixelConfig>,
    #[serde(default)]
    steps: Slot<StepSequence>,
    /// Root keys not modelled as sections
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Which part of the document a root key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKey {
    Id,
    Identity,
    Theme,
    Hero,
    Banners,
    DetailContent,
    FormConfig,
    Footer,
    Navigation,
    Gallery,
    Board,
    Location,
    SnsConfig,
    Features,
    ChatConfig,
    PopupConfig,
    PixelConfig,
    Steps,
    Extra,
}

impl SectionKey {
    fn of(root_key: &str) -> Self {
        match root_key {
            "id" => Self::Id,
            "theme" => Self::Theme,
            "hero" => Self::Hero,
            "banners" => Self::Banners,
            "detailContent" => Self::DetailContent,
            "formConfig" => Self::FormConfig,
            "footer" => Self::Footer,
            "navigation" => Self::Navigation,
            "gallery" => Self::Gallery,
            "board" => Self::Board,
            "location" => Self::Location,
            "snsConfig" => Self::SnsConfig,
            "features" => Self::Features,
            "chatConfig" => Self::ChatConfig,
            "popupConfig" => Self::PopupConfig,
            "pixelConfig" => Self::PixelConfig,
            "steps" => Self::Steps,
            key if Identity::KEYS.contains(&key) => Self::Identity,
            _ => Self::Extra,
        }
    }
}

impl ConfigDocument {
    /// Assemble a document from its required sections
    ///
    /// Optional sections start out not configured.
    #[must_use]
    pub fn new(
        id: impl Into<DocumentId>,
        identity: Identity,
        theme: Theme,
        hero: HeroSection,
        form_config: FormSection,
        footer: FooterSection,
    ) -> Self {
        Self {
            id: id.into(),
            identity: Arc::new(identity),
            theme: Arc::new(theme),
            hero: Arc::new(hero),
            banners: Arc::new(Vec::new()),
            detail_content: Arc::new(Vec::new()),
            form_config: Arc::new(form_config),
            footer: Arc::new(footer),
            navigation: Slot::NotConfigured,
            gallery: Slot::NotConfigured,
            board: Slot::NotConfigured,
            location: Slot::NotConfigured,
            sns_config: Slot::NotConfigured,
            features: Slot::NotConfigured,
            chat_config: Slot::NotConfigured,
            popup_config: Slot::NotConfigured,
            pixel_config: Slot::NotConfigured,
            steps: Slot::NotConfigured,
            extra: Map::new(),
        }
    }

    /// Document identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Title and metadata
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Colour scheme
    #[inline]
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Header area
    #[inline]
    #[must_use]
    pub fn hero(&self) -> &HeroSection {
        &self.hero
    }

    /// Floating banners, in order
    #[inline]
    #[must_use]
    pub fn banners(&self) -> &[FloatingBanner] {
        &self.banners
    }

    /// Detail-content blocks, in order
    #[inline]
    #[must_use]
    pub fn detail_content(&self) -> &[DetailContentBlock] {
        &self.detail_content
    }

    /// Lead form configuration
    #[inline]
    #[must_use]
    pub fn form_config(&self) -> &FormSection {
        &self.form_config
    }

    /// Canonical field pool
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &FieldRegistry {
        &self.form_config.fields
    }

    /// Footer
    #[inline]
    #[must_use]
    pub fn footer(&self) -> &FooterSection {
        &self.footer
    }

    /// Navigation bar
    #[inline]
    #[must_use]
    pub fn navigation(&self) -> &Slot<NavigationConfig> {
        &self.navigation
    }

    /// Image gallery
    #[inline]
    #[must_use]
    pub fn gallery(&self) -> &Slot<GallerySection> {
        &self.gallery
    }

    /// Notice board
    #[inline]
    #[must_use]
    pub fn board(&self) -> &Slot<BoardSection> {
        &self.board
    }

    /// Location
    #[inline]
    #[must_use]
    pub fn location(&self) -> &Slot<LocationSection> {
        &self.location
    }

    /// Social links
    #[inline]
    #[must_use]
    pub fn sns_config(&self) -> &Slot<SnsConfig> {
        &self.sns_config
    }

    /// Feature cards
    #[inline]
    #[must_use]
    pub fn features(&self) -> &Slot<FeatureSection> {
        &self.features
    }

    /// Chat button
    #[inline]
    #[must_use]
    pub fn chat_config(&self) -> &Slot<ChatButtonConfig> {
        &self.chat_config
    }

    /// Entry popup
    #[inline]
    #[must_use]
    pub fn popup_config(&self) -> &Slot<PopupConfig> {
        &self.popup_config
    }

    /// Tracking ids
    #[inline]
    #[must_use]
    pub fn pixel_config(&self) -> &Slot<PixelConfig> {
        &self.pixel_config
    }

    /// Step flow
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &Slot<StepSequence> {
        &self.steps
    }

    /// Root keys kept verbatim
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Document with a replaced field pool
    #[must_use]
    pub fn with_fields(&self, fields: FieldRegistry) -> Self {
        let mut form = (*self.form_config).clone();
        form.fields = fields;
        Self {
            form_config: Arc::new(form),
            ..self.clone()
        }
    }

    /// Document with a replaced step flow
    #[must_use]
    pub fn with_steps(&self, steps: StepSequence) -> Self {
        Self {
            steps: Slot::configured(steps),
            ..self.clone()
        }
    }

    /// Document with replaced banners
    #[must_use]
    pub fn with_banners(&self, banners: Vec<FloatingBanner>) -> Self {
        Self {
            banners: Arc::new(banners),
            ..self.clone()
        }
    }

    /// Document with replaced detail blocks
    #[must_use]
    pub fn with_detail_content(&self, blocks: Vec<DetailContentBlock>) -> Self {
        Self {
            detail_content: Arc::new(blocks),
            ..self.clone()
        }
    }

    /// Write `value` at `path`, rebuilding only the addressed section
    ///
    /// The first segment selects the section; identity keys such as
    /// `title` live at the root. Paths ending at a section root replace the
    /// whole section, and `null` switches an optional section off. Unknown
    /// root keys are stored verbatim.
    ///
    /// Sharing is per section: every other section keeps its allocation,
    /// but the edited section is re-typed as a whole, so its unedited
    /// members are fresh copies.
    ///
    /// # Errors
    /// - [`DocumentError::Path`] for an empty or non-traversable path
    /// - [`DocumentError::ImmutableId`] for any path under `id`
    /// - [`DocumentError::InvalidValue`] if the section no longer fits its type
    /// - [`DocumentError::DuplicateId`] if two banners, blocks, fields or
    ///   steps would share an id
    /// - [`DocumentError::StepKindChanged`] if an existing step would be retagged
    pub fn set(&self, path: &DocPath, value: Node) -> Result<Self, DocumentError> {
        let Some(first) = path.first() else {
            return Err(PathError::EmptyPath.into());
        };
        let root_key = first.as_key();
        let rest = path.tail();
        let mut next = self.clone();

        match SectionKey::of(&root_key) {
            SectionKey::Id => return Err(DocumentError::ImmutableId),
            SectionKey::Identity => {
                next.identity = Arc::new(rewrite(&*self.identity, "identity", path, value)?);
            }
            SectionKey::Theme => next.theme = Arc::new(rewrite(&*self.theme, &root_key, &rest, value)?),
            SectionKey::Hero => next.hero = Arc::new(rewrite(&*self.hero, &root_key, &rest, value)?),
            SectionKey::Banners => {
                let banners: Vec<FloatingBanner> = rewrite(&*self.banners, &root_key, &rest, value)?;
                ensure_unique_ids(
                    &root_key,
                    self.banners.iter().map(|b| b.id.as_str()),
                    banners.iter().map(|b| b.id.as_str()),
                )?;
                next.banners = Arc::new(banners);
            }
            SectionKey::DetailContent => {
                let blocks: Vec<DetailContentBlock> = rewrite(&*self.detail_content, &root_key, &rest, value)?;
                ensure_unique_ids(
                    &root_key,
                    self.detail_content.iter().map(|b| b.id.as_str()),
                    blocks.iter().map(|b| b.id.as_str()),
                )?;
                next.detail_content = Arc::new(blocks);
            }
            SectionKey::FormConfig => {
                let form: FormSection = rewrite(&*self.form_config, &root_key, &rest, value)?;
                ensure_unique_ids(
                    &root_key,
                    self.form_config.fields.ids().map(|id| id.as_str()),
                    form.fields.ids().map(|id| id.as_str()),
                )?;
                next.form_config = Arc::new(form);
            }
            SectionKey::Footer => next.footer = Arc::new(rewrite(&*self.footer, &root_key, &rest, value)?),
            SectionKey::Navigation => next.navigation = rewrite_slot(&self.navigation, &root_key, &rest, value)?,
            SectionKey::Gallery => next.gallery = rewrite_slot(&self.gallery, &root_key, &rest, value)?,
            SectionKey::Board => next.board = rewrite_slot(&self.board, &root_key, &rest, value)?,
            SectionKey::Location => next.location = rewrite_slot(&self.location, &root_key, &rest, value)?,
            SectionKey::SnsConfig => next.sns_config = rewrite_slot(&self.sns_config, &root_key, &rest, value)?,
            SectionKey::Features => next.features = rewrite_slot(&self.features, &root_key, &rest, value)?,
            SectionKey::ChatConfig => next.chat_config = rewrite_slot(&self.chat_config, &root_key, &rest, value)?,
            SectionKey::PopupConfig => {
                next.popup_config = rewrite_slot(&self.popup_config, &root_key, &rest, value)?;
            }
            SectionKey::PixelConfig => {
                next.pixel_config = rewrite_slot(&self.pixel_config, &root_key, &rest, value)?;
            }
            SectionKey::Steps => {
                let steps = rewrite_slot(&self.steps, &root_key, &rest, value)?;
                ensure_unique_ids(
                    &root_key,
                    self.steps.get().into_iter().flatten().map(|s| s.id().as_str()),
                    steps.get().into_iter().flatten().map(|s| s.id().as_str()),
                )?;
                ensure_step_kinds_kept(self.steps.get(), steps.get())?;
                next.steps = steps;
            }
            SectionKey::Extra => {
                let node = Node::from(Value::Object(self.extra.clone()));
                let updated = pagecraft_tree::set(&node, path, value)?;
                let Value::Object(extra) = updated.to_value() else {
                    return Err(DocumentError::InvalidValue {
                        section: root_key.into_owned(),
                        reason: "root must stay an object".to_string(),
                    });
                };
                next.extra = extra;
            }
        }
        Ok(next)
    }

    /// Value at `path` in the plain representation
    ///
    /// # Errors
    /// [`DocumentError::Serialization`] if the document cannot be serialized.
    pub fn get(&self, path: &DocPath) -> Result<Option<Node>, DocumentError> {
        let node = self.to_node()?;
        Ok(pagecraft_tree::get(&node, path).cloned())
    }

    /// Whether the section under `root_key` is the same allocation in both documents
    ///
    /// Identity keys compare the identity section; unknown keys compare the
    /// verbatim root values.
    #[must_use]
    pub fn shares_section(&self, other: &Self, root_key: &str) -> bool {
        match SectionKey::of(root_key) {
            SectionKey::Id => self.id == other.id,
            SectionKey::Identity => Arc::ptr_eq(&self.identity, &other.identity),
            SectionKey::Theme => Arc::ptr_eq(&self.theme, &other.theme),
            SectionKey::Hero => Arc::ptr_eq(&self.hero, &other.hero),
            SectionKey::Banners => Arc::ptr_eq(&self.banners, &other.banners),
            SectionKey::DetailContent => Arc::ptr_eq(&self.detail_content, &other.detail_content),
            SectionKey::FormConfig => Arc::ptr_eq(&self.form_config, &other.form_config),
            SectionKey::Footer => Arc::ptr_eq(&self.footer, &other.footer),
            SectionKey::Navigation => self.navigation.ptr_eq(&other.navigation),
            SectionKey::Gallery => self.gallery.ptr_eq(&other.gallery),
            SectionKey::Board => self.board.ptr_eq(&other.board),
            SectionKey::Location => self.location.ptr_eq(&other.location),
            SectionKey::SnsConfig => self.sns_config.ptr_eq(&other.sns_config),
            SectionKey::Features => self.features.ptr_eq(&other.features),
            SectionKey::ChatConfig => self.chat_config.ptr_eq(&other.chat_config),
            SectionKey::PopupConfig => self.popup_config.ptr_eq(&other.popup_config),
            SectionKey::PixelConfig => self.pixel_config.ptr_eq(&other.pixel_config),
            SectionKey::Steps => self.steps.ptr_eq(&other.steps),
            SectionKey::Extra => self.extra.get(root_key) == other.extra.get(root_key),
        }
    }

    /// Plain tree representation
    ///
    /// # Errors
    /// [`DocumentError::Serialization`] if a section cannot be serialized.
    pub fn to_node(&self) -> Result<Node, DocumentError> {
        Ok(Node::from(serde_json::to_value(self)?))
    }

    /// Rebuild from the plain tree representation
    ///
    /// # Errors
    /// [`DocumentError::Serialization`] if the tree does not fit the document shape.
    pub fn from_node(node: &Node) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(node.to_value())?)
    }

    /// Serialize to JSON text
    ///
    /// # Errors
    /// [`DocumentError::Serialization`] on serializer failure.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// [`DocumentError::Serialization`] if the text is not a document.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Apply `value` at `rest` inside a section and re-type it
fn rewrite<S, T>(current: &S, section: &str, rest: &DocPath, value: Node) -> Result<T, DocumentError>
where
    S: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let next = if rest.is_empty() {
        value
    } else {
        let node = Node::from(serde_json::to_value(current)?);
        pagecraft_tree::set(&node, rest, value)?
    };
    serde_json::from_value(next.to_value()).map_err(|e| DocumentError::InvalidValue {
        section: section.to_string(),
        reason: e.to_string(),
    })
}

fn rewrite_slot<T>(current: &Slot<T>, section: &str, rest: &DocPath, value: Node) -> Result<Slot<T>, DocumentError>
where
    T: Serialize + DeserializeOwned,
{
    rewrite::<_, Option<T>>(&current.get(), section, rest, value).map(Slot::from)
}

/// Rejects an id repeated in `after` unless it was already repeated in `before`
fn ensure_unique_ids<'a>(
    section: &str,
    before: impl Iterator<Item = &'a str>,
    mut after: impl Iterator<Item = &'a str>,
) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    let already: HashSet<&str> = before.filter(|id| !seen.insert(*id)).collect();
    let mut seen = HashSet::new();
    match after.find(|id| !seen.insert(*id) && !already.contains(id)) {
        Some(id) => Err(DocumentError::DuplicateId {
            section: section.to_string(),
            id: id.to_string(),
        }),
        None => Ok(()),
    }
}

fn ensure_step_kinds_kept(before: Option<&StepSequence>, after: Option<&StepSequence>) -> Result<(), DocumentError> {
    let (Some(before), Some(after)) = (before, after) else {
        return Ok(());
    };
    for step in after {
        if let Some(old) = before.get(step.id()) {
            if old.kind() != step.kind() {
                return Err(DocumentError::StepKindChanged(step.id().clone()));
            }
        }
    }
    Ok(())
}
