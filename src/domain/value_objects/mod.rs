//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod date;

pub use date::Date;
