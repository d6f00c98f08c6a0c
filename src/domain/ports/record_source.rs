//! RecordSource port - abstraction for importing raw records
//!
//! Seeding a store pulls field maps from a source one record at a time.
//! The domain never learns whether records come from a delimited file,
//! a fixture, or somewhere else.

use std::collections::HashMap;

use anyhow::{Context, Result};

/// Raw imported record: column name -> value
pub type FieldMap = HashMap<String, String>;

/// Fetch a required field from an imported record
pub fn require_field<'a>(fields: &'a FieldMap, field: &str) -> Result<&'a str> {
    fields
        .get(field)
        .map(String::as_str)
        .with_context(|| format!("missing required field '{field}'"))
}

/// Abstract source of raw records for seeding stores
///
/// This trait is implemented by the infrastructure layer.
pub trait RecordSource {
    /// Pull the next record; `None` when the source is exhausted
    fn next_record(&mut self) -> Result<Option<FieldMap>>;
}
