//! Pagecraft Editor
//!
//! Load, normalize, edit and save page configuration documents.
//!
//! # Core Concepts
//!
//! - [`Editor`]: Local draft store, cached remote store, uploader and migrator
//! - [`EditSession`]: One open document; every edit yields a new version
//! - [`EditorConfig`]: Size ceiling, cache and save behaviour
//! - [`EditorError`]: Every failure an editing flow can surface
//!
//! # Example
//!
//! ```rust,ignore
//! let editor = Editor::new(EditorConfig::default(), MemoryDraftStore::new(), remote);
//! let mut session = editor.open("landing-1").await?;
//! session.set_at("hero.headline", "Spring sale")?;
//! session.save_draft().await?;
//! let report = session.save().await?;
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod session;

pub use config::EditorConfig;
pub use error::EditorError;
pub use session::{EditSession, Editor, LoadSource, SaveReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
