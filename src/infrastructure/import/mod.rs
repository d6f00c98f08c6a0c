//! Record Source Implementations
//!
//! Concrete implementations of the record source port for seeding
//! stores from external files.

mod delimited;

pub use delimited::DelimitedRecordSource;
