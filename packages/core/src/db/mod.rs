//! Record persistence
//!
//! The engine treats storage as a plain load/save pair around its pure
//! computation:
//!
//! - `RecordStore` - the async trait callers implement
//! - `InMemoryRecordStore` - process-local store for tests and demos
//! - `JsonFileStore` - a JSON array on disk, replaced atomically on save

mod json_file_store;
mod memory_store;
mod record_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::InMemoryRecordStore;
pub use record_store::RecordStore;
