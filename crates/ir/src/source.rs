//! The introspection seam
//!
//! The schema engine never looks at a model's native representation. It
//! asks a [`ModelSource`] for a [`ModelDescriptor`] and works from that.
//! Three sources ship with the crate:
//!
//! - a `ModelDescriptor` describes itself,
//! - [`ModelOf<T>`] describes a Rust type implementing [`Model`],
//! - [`JsonModel`] parses a descriptor out of JSON text.

use crate::model::ModelDescriptor;
use schemaloader_core::{EngineError, EngineResult};
use std::fmt;
use std::marker::PhantomData;

/// Anything that can produce a model descriptor
pub trait ModelSource {
    /// Extract the descriptor; failures surface as `DescriptorExtractionFailed`
    fn describe(&self) -> EngineResult<ModelDescriptor>;
}

impl ModelSource for ModelDescriptor {
    fn describe(&self) -> EngineResult<ModelDescriptor> {
        Ok(self.clone().normalized())
    }
}

impl<S: ModelSource + ?Sized> ModelSource for &S {
    fn describe(&self) -> EngineResult<ModelDescriptor> {
        (**self).describe()
    }
}

// ============================================================================
// Rust types as models
// ============================================================================

/// A Rust type that knows its own descriptor
///
/// ```rust,ignore
/// struct User;
///
/// impl Model for User {
///     fn descriptor() -> ModelDescriptor {
///         ModelDescriptor::new("User").with_column(Column::id())
///     }
/// }
///
/// let sql = loader.load(&[&model::<User>()])?;
/// ```
pub trait Model {
    fn descriptor() -> ModelDescriptor;
}

/// Handle standing in for a model type, no instance needed
pub struct ModelOf<T>(PhantomData<fn() -> T>);

/// Create a handle for the model type `T`
pub fn model<T: Model>() -> ModelOf<T> {
    ModelOf(PhantomData)
}

impl<T> fmt::Debug for ModelOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelOf<{}>", std::any::type_name::<T>())
    }
}

impl<T: Model> ModelSource for ModelOf<T> {
    fn describe(&self) -> EngineResult<ModelDescriptor> {
        Ok(T::descriptor().normalized())
    }
}

// ============================================================================
// JSON models
// ============================================================================

/// A model descriptor encoded as JSON text
#[derive(Debug, Clone)]
pub struct JsonModel {
    /// Where the text came from, used in error messages
    pub origin: String,

    /// The JSON document
    pub text: String,
}

impl JsonModel {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }
}

impl ModelSource for JsonModel {
    fn describe(&self) -> EngineResult<ModelDescriptor> {
        serde_json::from_str::<ModelDescriptor>(&self.text)
            .map(ModelDescriptor::normalized)
            .map_err(|e| EngineError::extraction(&self.origin, e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
