//! Pagecraft Storage
//!
//! Seams between the document core and the outside world: where raw
//! documents are loaded from and saved to, and where uploaded assets go.
//!
//! # Core Concepts
//!
//! - [`PersistenceGateway`]: Async load / save / delete of raw trees by id
//! - [`MemoryDraftStore`]: Local drafts kept as JSON text
//! - [`CachedGateway`]: TTL cache in front of a slower remote gateway
//! - [`AssetUploader`]: Turns a blob into a public URL
//! - [`ensure_within_ceiling`]: Size check applied before every save

#![warn(unreachable_pub)]

mod asset;
mod cached;
mod draft;
mod error;
mod gateway;

pub use asset::{AssetBlob, AssetUploader};
pub use cached::{CacheStats, CachedGateway, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use draft::MemoryDraftStore;
pub use error::{GatewayError, UploadError};
pub use gateway::{ensure_within_ceiling, PersistenceGateway};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
