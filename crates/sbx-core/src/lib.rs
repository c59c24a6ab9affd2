//! sbx-core: shared types for the strongbox encrypted index/content store.
//!
//! Holds the error taxonomy, the [`IndexItem`] trait (HMAC-protected
//! metadata records) and the [`IndexStore`] persistence interface the
//! crypto engine consumes.

pub mod error;
pub mod item;
pub mod store;

pub use error::{SbxError, SbxResult};
pub use item::IndexItem;
pub use store::{IndexStore, MemoryIndexStore};
