pub mod common;
pub mod draft;
pub mod init;
pub mod memory_item;
pub mod page_record;
pub mod template;

// Re-export common types/enums for easier access
pub use common::*;
pub use draft::{BasicInfo, Draft, PageSettings};
pub use memory_item::{FileCandidate, MemoryItem};
pub use page_record::PageRecord;
