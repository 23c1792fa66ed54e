//! Editing sessions
//!
//! An [`Editor`] owns the backends; each [`EditSession`] owns one document.
//! Opening reads the local draft first, then the remote store, and
//! normalizes whatever it finds. Every edit replaces the current document
//! with a new version that shares untouched sections with the old one.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use pagecraft_migrate::{default_document, MigrationError, SchemaMigrator};
use pagecraft_model::{
    repair_references, validate_references, BlockId, ConfigDocument, DanglingReference,
    Direction, DocumentId, FieldDefinition, FieldDraft, FieldId, FieldPatch, IdSource,
    MoveOutcome, StepError, StepId, StepKind, StepSequence, UlidIds,
};
use pagecraft_store::{
    ensure_within_ceiling, AssetBlob, AssetUploader, CachedGateway, GatewayError,
    PersistenceGateway,
};
use pagecraft_tree::{DocPath, Node};
use tracing::{debug, error, info, warn};

use crate::config::EditorConfig;
use crate::error::EditorError;

/// Where an opened document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Unsaved local draft
    LocalDraft,
    /// Remote store
    Remote,
    /// Nothing stored; started from defaults
    Fresh,
    /// Stored document was unusable; started from defaults
    Fallback,
}

impl Display for LoadSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LocalDraft => "local-draft",
            Self::Remote => "remote",
            Self::Fresh => "fresh",
            Self::Fallback => "fallback",
        })
    }
}

/// Outcome of a successful save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Serialized size written
    pub bytes: usize,
    /// References removed before writing
    pub pruned: Vec<DanglingReference>,
    /// References left dangling in the written document
    pub dangling: Vec<DanglingReference>,
}

/// Shared backends and settings for editing sessions
#[derive(Clone)]
pub struct Editor {
    config: EditorConfig,
    local: Arc<dyn PersistenceGateway>,
    remote: Arc<dyn PersistenceGateway>,
    uploader: Option<Arc<dyn AssetUploader>>,
    migrator: Arc<SchemaMigrator>,
}

impl Editor {
    /// Create editor over a local draft store and a remote store
    ///
    /// The remote store is cached with the TTL and capacity from `config`.
    #[must_use]
    pub fn new<L, R>(config: EditorConfig, local: L, remote: R) -> Self
    where
        L: PersistenceGateway + 'static,
        R: PersistenceGateway + 'static,
    {
        let remote = CachedGateway::with_ttl(remote, config.remote_cache_capacity, config.remote_cache_ttl());
        Self {
            config,
            local: Arc::new(local),
            remote: Arc::new(remote),
            uploader: None,
            migrator: Arc::new(SchemaMigrator::default()),
        }
    }

    /// With asset uploader
    #[must_use]
    pub fn with_uploader<U: AssetUploader + 'static>(mut self, uploader: U) -> Self {
        self.uploader = Some(Arc::new(uploader));
        self
    }

    /// With custom migrator
    #[must_use]
    pub fn with_migrator(mut self, migrator: SchemaMigrator) -> Self {
        self.migrator = Arc::new(migrator);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Open the document stored under `id`
    ///
    /// Reads the local draft first and the remote store second; with
    /// neither present the session starts from the default document. A
    /// draft that cannot be normalized is skipped in favour of the remote
    /// copy.
    ///
    /// # Errors
    /// - [`EditorError::Gateway`] if the remote store fails
    /// - [`EditorError::Migration`] if the stored document cannot be
    ///   normalized and fallback to defaults is disabled
    pub async fn open(&self, id: impl Into<DocumentId>) -> Result<EditSession, EditorError> {
        let id = id.into();
        let defaults = default_document(id.as_str());

        let mut unusable_draft = None;
        let mut opened = None;
        if let Some(raw) = self.load_local(&id).await {
            match self.normalize(&id, &raw, &defaults) {
                Ok(doc) => opened = Some((doc, LoadSource::LocalDraft)),
                Err(err @ MigrationError::UnrecoverableSchema { .. }) => {
                    warn!(document = %id, error = %err, "Local draft unusable, trying remote");
                    unusable_draft = Some(err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let (doc, source) = match opened {
            Some(opened) => opened,
            None => match self.remote.load(&id).await {
                Ok(raw) => match self.normalize(&id, &raw, &defaults) {
                    Ok(doc) => (doc, LoadSource::Remote),
                    Err(err) => self.fall_back(&id, err, defaults)?,
                },
                Err(GatewayError::NotFound(_)) => match unusable_draft {
                    Some(err) => self.fall_back(&id, err, defaults)?,
                    None => (defaults, LoadSource::Fresh),
                },
                Err(err) => return Err(err.into()),
            },
        };

        let dangling = validate_references(&doc);
        if !dangling.is_empty() {
            warn!(document = %id, count = dangling.len(), "Opened document has dangling references");
        }
        info!(document = %id, %source, "Opened document");

        Ok(EditSession {
            editor: self.clone(),
            id,
            doc,
            source,
            dirty: false,
            ids: Box::new(UlidIds),
        })
    }

    async fn load_local(&self, id: &DocumentId) -> Option<Node> {
        match self.local.load(id).await {
            Ok(raw) => Some(raw),
            Err(GatewayError::NotFound(_)) => None,
            Err(err) => {
                warn!(document = %id, error = %err, "Local draft unreadable, trying remote");
                None
            }
        }
    }

    fn normalize(&self, id: &DocumentId, raw: &Node, defaults: &ConfigDocument) -> Result<ConfigDocument, MigrationError> {
        let (doc, report) = self.migrator.normalize_with_report(raw, defaults)?;
        if !report.is_clean() {
            debug!(
                document = %id,
                applied = ?report.applied,
                filled = ?report.filled_sections,
                reset = ?report.reset_sections,
                "Normalized stored document"
            );
        }
        Ok(doc)
    }

    fn fall_back(
        &self,
        id: &DocumentId,
        err: MigrationError,
        defaults: ConfigDocument,
    ) -> Result<(ConfigDocument, LoadSource), EditorError> {
        match err {
            MigrationError::UnrecoverableSchema { .. } if self.config.fallback_to_defaults => {
                warn!(document = %id, error = %err, "Stored document unusable, starting from defaults");
                Ok((defaults, LoadSource::Fallback))
            }
            err => Err(err.into()),
        }
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("has_uploader", &self.uploader.is_some())
            .field("migrator", &self.migrator)
            .finish_non_exhaustive()
    }
}

/// One open document and the edits made to it
pub struct EditSession {
    editor: Editor,
    id: DocumentId,
    doc: ConfigDocument,
    source: LoadSource,
    dirty: bool,
    ids: Box<dyn IdSource + Send + Sync>,
}

impl EditSession {
    /// With custom id generation for new fields and steps
    #[must_use]
    pub fn with_id_source<I: IdSource + Send + Sync + 'static>(mut self, ids: I) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Storage key of the document
    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Current document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    /// Where the document was loaded from
    #[inline]
    #[must_use]
    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// Whether there are edits not yet saved remotely
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn replace(&mut self, next: ConfigDocument) {
        self.doc = next;
        self.dirty = true;
    }

    /// Write `value` at `path`
    ///
    /// # Errors
    /// [`EditorError::Document`] if the document rejects the value
    pub fn set(&mut self, path: &DocPath, value: impl Into<Node>) -> Result<(), EditorError> {
        let next = self.doc.set(path, value.into())?;
        self.replace(next);
        Ok(())
    }

    /// Write `value` at a dotted path such as `hero.headline`
    ///
    /// # Errors
    /// [`EditorError::Path`] if the path does not parse, otherwise as [`EditSession::set`]
    pub fn set_at(&mut self, path: &str, value: impl Into<Node>) -> Result<(), EditorError> {
        let path: DocPath = path.parse()?;
        self.set(&path, value)
    }

    /// Value at a dotted path
    ///
    /// # Errors
    /// [`EditorError::Path`] if the path does not parse
    pub fn get_at(&self, path: &str) -> Result<Option<Node>, EditorError> {
        let path: DocPath = path.parse()?;
        Ok(self.doc.get(&path)?)
    }

    /// Add a field to the registry
    ///
    /// # Errors
    /// [`EditorError::Registry`] if the draft names an id already in use
    pub fn add_field(&mut self, draft: FieldDraft) -> Result<FieldId, EditorError> {
        let (fields, id) = self.doc.fields().add(draft, self.ids.as_mut())?;
        let next = self.doc.with_fields(fields);
        self.replace(next);
        Ok(id)
    }

    /// Patch a registry field
    ///
    /// # Errors
    /// [`EditorError::Registry`] if the field does not exist
    pub fn update_field(&mut self, id: &FieldId, patch: &FieldPatch) -> Result<(), EditorError> {
        let fields = self.doc.fields().update(id, patch)?;
        let next = self.doc.with_fields(fields);
        self.replace(next);
        Ok(())
    }

    /// Remove a registry field; returns the references it left dangling
    ///
    /// # Errors
    /// [`EditorError::Registry`] if the field does not exist
    pub fn remove_field(&mut self, id: &FieldId) -> Result<Vec<DanglingReference>, EditorError> {
        let fields = self.doc.fields().remove(id)?;
        let next = self.doc.with_fields(fields);
        self.replace(next);

        let dangling: Vec<_> = validate_references(&self.doc)
            .into_iter()
            .filter(|d| matches!(d, DanglingReference::Field { field, .. } if field == id))
            .collect();
        if !dangling.is_empty() {
            warn!(document = %self.id, field = %id, steps = dangling.len(), "Removed field is still bound to steps");
        }
        Ok(dangling)
    }

    /// Insert a step at `at_index`, creating the step flow if needed
    pub fn insert_step(&mut self, kind: StepKind, at_index: usize) -> StepId {
        let current = self.doc.steps().get().cloned().unwrap_or_default();
        let (steps, id) = current.insert(kind, at_index, self.ids.as_mut());
        let next = self.doc.with_steps(steps);
        self.replace(next);
        id
    }

    fn edit_steps<T>(
        &mut self,
        step: &StepId,
        edit: impl FnOnce(&StepSequence) -> Result<(StepSequence, T), StepError>,
    ) -> Result<T, EditorError> {
        let steps = self
            .doc
            .steps()
            .get()
            .ok_or_else(|| StepError::NotFound(step.clone()))?;
        let (steps, out) = edit(steps)?;
        let next = self.doc.with_steps(steps);
        self.replace(next);
        Ok(out)
    }

    /// Move a step one position
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist
    pub fn move_step(&mut self, id: &StepId, direction: Direction) -> Result<MoveOutcome, EditorError> {
        let steps = self
            .doc
            .steps()
            .get()
            .ok_or_else(|| StepError::NotFound(id.clone()))?;
        let (steps, outcome) = steps.move_step(id, direction)?;
        if outcome != MoveOutcome::NoOp {
            let next = self.doc.with_steps(steps);
            self.replace(next);
        }
        Ok(outcome)
    }

    /// Remove a step
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist
    pub fn remove_step(&mut self, id: &StepId) -> Result<(), EditorError> {
        self.edit_steps(id, |steps| Ok((steps.remove(id)?, ())))
    }

    /// Bind a registry field to a step
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step or the field does not exist
    pub fn bind_field(&mut self, step: &StepId, field: &FieldId) -> Result<(), EditorError> {
        let registry = self.doc.fields().clone();
        self.edit_steps(step, |steps| Ok((steps.bind_field(step, field, &registry)?, ())))
    }

    /// Unbind a field from a step, dropping its override
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist or does not bind the field
    pub fn unbind_field(&mut self, step: &StepId, field: &FieldId) -> Result<(), EditorError> {
        self.edit_steps(step, |steps| Ok((steps.unbind_field(step, field)?, ())))
    }

    /// Layer a step-local patch over a bound field
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist or does not bind the field
    pub fn override_field(&mut self, step: &StepId, field: &FieldId, patch: &FieldPatch) -> Result<(), EditorError> {
        self.edit_steps(step, |steps| Ok((steps.override_field(step, field, patch)?, ())))
    }

    /// Drop a step-local override
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist
    pub fn clear_override(&mut self, step: &StepId, field: &FieldId) -> Result<(), EditorError> {
        self.edit_steps(step, |steps| Ok((steps.clear_override(step, field)?, ())))
    }

    /// Point a step at a detail content block, or clear the pointer
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist or cannot show content
    pub fn set_content_ref(&mut self, step: &StepId, block: Option<BlockId>) -> Result<(), EditorError> {
        self.edit_steps(step, |steps| Ok((steps.set_content_ref(step, block)?, ())))
    }

    /// Fields of a step as rendered, overrides applied
    ///
    /// # Errors
    /// [`EditorError::Step`] if the step does not exist or a bound field is missing
    pub fn effective_fields(&self, step: &StepId) -> Result<Vec<FieldDefinition>, EditorError> {
        let steps = self
            .doc
            .steps()
            .get()
            .ok_or_else(|| StepError::NotFound(step.clone()))?;
        Ok(steps.effective_fields(step, self.doc.fields())?)
    }

    /// Every unresolved reference in the current document
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        validate_references(&self.doc)
    }

    /// Remove every dangling reference; returns what was removed
    pub fn repair_references(&mut self) -> Vec<DanglingReference> {
        let dangling = validate_references(&self.doc);
        if !dangling.is_empty() {
            let next = repair_references(&self.doc);
            self.replace(next);
        }
        dangling
    }

    /// Upload an asset and store its URL at `path`
    ///
    /// # Errors
    /// - [`EditorError::NoUploader`] if the editor has no uploader
    /// - [`EditorError::Upload`] if the upload fails
    /// - [`EditorError::Document`] if the URL cannot be written at `path`
    pub async fn attach_asset(&mut self, path: &DocPath, blob: AssetBlob) -> Result<String, EditorError> {
        let uploader = self.editor.uploader.clone().ok_or(EditorError::NoUploader)?;
        let file_name = blob.file_name.clone();
        let url = uploader.upload(blob).await?;
        debug!(document = %self.id, %path, file = %file_name, "Asset uploaded");
        self.set(path, url.as_str())?;
        Ok(url)
    }

    /// Write the current document to the local draft store
    ///
    /// # Errors
    /// [`EditorError::Gateway`] if the draft store fails
    pub async fn save_draft(&self) -> Result<(), EditorError> {
        let node = self.doc.to_node()?;
        self.editor.local.save(&self.id, &node).await?;
        Ok(())
    }

    /// Drop the local draft, keeping the in-memory document
    ///
    /// # Errors
    /// [`EditorError::Gateway`] if the draft store fails
    pub async fn discard_draft(&self) -> Result<(), EditorError> {
        self.editor.local.delete(&self.id).await?;
        Ok(())
    }

    /// Write the current document to the remote store and clear the draft
    ///
    /// # Errors
    /// - [`EditorError::Gateway`] with [`GatewayError::TooLarge`] if the
    ///   document exceeds the configured ceiling
    /// - [`EditorError::Gateway`] if the remote store fails
    pub async fn save(&mut self) -> Result<SaveReport, EditorError> {
        let config = &self.editor.config;
        let mut doc = self.doc.clone();
        let mut report = SaveReport::default();

        if config.validate_before_save {
            let dangling = validate_references(&doc);
            if !dangling.is_empty() {
                if config.prune_dangling_on_save {
                    info!(document = %self.id, count = dangling.len(), "Pruning dangling references before save");
                    doc = repair_references(&doc);
                    report.pruned = dangling;
                } else {
                    warn!(document = %self.id, count = dangling.len(), "Saving with dangling references");
                    report.dangling = dangling;
                }
            }
        }

        let node = doc.to_node()?;
        report.bytes = match ensure_within_ceiling(&node, config.max_document_bytes) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(document = %self.id, error = %err, "Save rejected");
                return Err(err.into());
            }
        };

        if let Err(err) = self.editor.remote.save(&self.id, &node).await {
            error!(document = %self.id, error = %err, "Remote save failed");
            return Err(err.into());
        }
        if let Err(err) = self.editor.local.delete(&self.id).await {
            warn!(document = %self.id, error = %err, "Draft not cleared after save");
        }

        info!(document = %self.id, bytes = report.bytes, "Saved document");
        self.doc = doc;
        self.dirty = false;
        Ok(report)
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
