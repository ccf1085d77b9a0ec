// Local key-value persistence
// Stands in for browser storage so the browse pipeline can run (and be tested) anywhere

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, StoreError};
