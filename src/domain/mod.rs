//! Domain Layer
//!
//! The core of the circulation engine - business logic without direct
//! I/O.
//!
//! ## Structure
//!
//! - `entities/` - Core domain entities (Book, Member, LoanRecord, ...)
//! - `value_objects/` - Immutable value types (Date)
//! - `services/` - Stateful components (EntityStore, LoanLedger, ...)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - Persistence and imports go through ports
//! 2. **Composition** - The engine owns components; nothing inherits
//! 3. **Injection** - Every component takes its snapshot store; there
//!    are no globals

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
