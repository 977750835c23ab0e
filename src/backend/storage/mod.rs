// src/backend/storage/mod.rs
// Stable memory (ic-stable-structures) plus heap-only wizard sessions.

pub mod config;
pub mod documents;
pub mod memory;
pub mod metrics;
pub mod storable;
pub mod wizard_sessions;

pub use documents::{Collection, DocumentStore, StableDocumentStore};
pub use memory::Memory;
pub use storable::{Cbor, StorableString};
