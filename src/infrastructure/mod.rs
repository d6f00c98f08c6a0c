//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `stores/` - Snapshot store implementations (JSON files, in-memory)
//! - `import/` - Record source implementations (delimited files)

pub mod import;
pub mod stores;

// Re-export for convenience
pub use import::DelimitedRecordSource;
pub use stores::{InMemoryStore, JsonFileStore};
