//! Persistence layer: key-value backends and the versioned form store.

pub mod form_store;
pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use form_store::{FormStore, SCHEMA_VERSION};
pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
