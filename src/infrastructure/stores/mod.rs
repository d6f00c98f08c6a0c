//! Snapshot Store Implementations
//!
//! Concrete implementations of the snapshot store port.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
