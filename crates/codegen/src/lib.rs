//! # schemaloader Codegen
//!
//! Schema derivation engine for schemaloader.
//!
//! This crate turns a set of model descriptors into `CREATE TABLE`
//! statements for one SQL dialect.
//!
//! ## Pipeline
//!
//! - **Resolver**: decides which table realizes every many-to-many pair,
//!   auto-detecting join models regardless of supply order
//! - **Assembler**: builds tables, keys and constraints and orders them so
//!   referenced tables come first
//! - **Dialect renderers**: one backend per database
//! - **Loader**: the façade tying the stages together
//!

// ============================================================================
// Modules
// ============================================================================

pub mod assembler;
pub mod config;
pub mod dialect;
pub mod loader;
pub mod paths;
pub mod resolver;
pub mod schema;
pub mod sink;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{LoaderConfig, TableOrdering};
pub use dialect::{DialectRenderer, RenderContext, renderer_for};
pub use loader::Loader;
pub use resolver::{JoinSource, JoinTableStrategy, Resolution, ResolvedJoin};
pub use schema::{DerivedSchema, ForeignKey, Table, UniqueConstraint};
pub use sink::{Recorder, SqlText, Statement, StatementSink};

pub use schemaloader_core::{Dialect, EngineError, EngineResult};
pub use schemaloader_ir::{ModelDescriptor, ModelSource};
