//! # schemaloader core
//!
//! Core types, traits, and error handling for schemaloader.
//!
//! This crate provides the vocabulary shared by the other crates:
//!
//! - **Types**: semantic column types, dialects, relation kinds, referential actions
//! - **Traits**: `Validatable`
//! - **Errors**: unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use traits::Validatable;
pub use types::{DataType, Dialect, ReferentialAction, RelationKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
