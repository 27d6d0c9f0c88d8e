//! Loading model descriptors from JSON files
//!
//! A model file holds either one descriptor object or an array of them.
//! A directory is walked recursively for `*.json` files in sorted path
//! order, so the supply order of the resulting models is stable.

use crate::model::ModelDescriptor;
use schemaloader_core::{EngineError, EngineResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension for model files
pub const MODEL_FILE_EXTENSION: &str = "json";

/// Contents of one model file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelFile {
    Many(Vec<ModelDescriptor>),
    One(ModelDescriptor),
}

/// Parse descriptors from JSON text
///
/// `origin` names the text in error messages (usually the file path).
pub fn load_models_from_str(text: &str, origin: &str) -> EngineResult<Vec<ModelDescriptor>> {
    let file: ModelFile =
        serde_json::from_str(text).map_err(|e| EngineError::extraction(origin, e.to_string()))?;

    let models = match file {
        ModelFile::Many(models) => models,
        ModelFile::One(model) => vec![model],
    };

    Ok(models.into_iter().map(ModelDescriptor::normalized).collect())
}

/// Load descriptors from a single JSON file
pub fn load_models_from_file(path: impl AsRef<Path>) -> EngineResult<Vec<ModelDescriptor>> {
    let path = path.as_ref();

    let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let models = load_models_from_str(&text, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), count = models.len(), "loaded model file");
    Ok(models)
}

/// Load descriptors from a file, or from every `*.json` file under a directory
pub fn load_models_from_path(path: impl AsRef<Path>) -> EngineResult<Vec<ModelDescriptor>> {
    let path = path.as_ref();

    if !path.is_dir() {
        return load_models_from_file(path);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let is_model_file = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == MODEL_FILE_EXTENSION);
        if is_model_file {
            files.push(entry.into_path());
        }
    }

    let mut models = Vec::new();
    for file in &files {
        models.extend(load_models_from_file(file)?);
    }
    Ok(models)
}

// ============================================================================
// Tests
// ============================================================================
