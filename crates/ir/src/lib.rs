//! # schemaloader IR
//!
//! Model descriptors: the normalized, dialect-independent input of the
//! schema engine.
//!
//! ## Core Concepts
//!
//! - **ModelDescriptor**: one model (maps to a table) with ordered columns
//! - **Column**: name, semantic type, nullability, key and default markers
//! - **Relation**: belongs-to, has-many or many-to-many annotation
//! - **ModelSource**: the seam through which descriptors are extracted
//!

// Module declarations
pub mod column;
pub mod model;
pub mod naming;
pub mod relationship;
pub mod serialization;
pub mod source;

// Re-export commonly used types at crate root
pub use column::{Column, DefaultValue};
pub use model::{ModelDescriptor, SourcePos};
pub use relationship::Relation;
pub use serialization::{load_models_from_file, load_models_from_path, load_models_from_str};
pub use source::{JsonModel, Model, ModelOf, ModelSource, model};

// Re-export core types that are commonly used with IR
pub use schemaloader_core::{
    DataType, Dialect, EngineError, EngineResult, ReferentialAction, RelationKind, Validatable,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for declaring models
pub mod prelude {
    pub use crate::{
        Column, DataType, DefaultValue, Model, ModelDescriptor, ModelSource, ReferentialAction,
        Relation, RelationKind, model,
    };
}
