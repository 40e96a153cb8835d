//! Rendering of assembled documents to JSON or YAML, and file output.
//!
//! Both formats carry the same content; field order follows the document
//! structs and the declaration order kept by the builders.

use crate::document::SwaggerDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to pretty-printed JSON.
///
/// # Arguments
///
/// * `doc` - The assembled document
///
/// # Returns
///
/// The indented JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use docstring_swagger::document::DocumentBuilder;
/// use docstring_swagger::model::ModelRegistry;
/// use docstring_swagger::serializer::serialize_json;
/// use docstring_swagger::settings::Settings;
///
/// let doc = DocumentBuilder::new(&Settings::new()).build(&ModelRegistry::new());
/// let json = serialize_json(&doc).unwrap();
/// assert!(json.contains("\"swaggerVersion\": \"1.2\""));
/// ```
pub fn serialize_json(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize document to JSON")
}

/// Serializes a document to YAML.
///
/// # Arguments
///
/// * `doc` - The assembled document
///
/// # Returns
///
/// The YAML text.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use docstring_swagger::document::DocumentBuilder;
/// use docstring_swagger::model::ModelRegistry;
/// use docstring_swagger::serializer::serialize_yaml;
/// use docstring_swagger::settings::Settings;
///
/// let doc = DocumentBuilder::new(&Settings::new()).build(&ModelRegistry::new());
/// let yaml = serialize_yaml(&doc).unwrap();
/// assert!(yaml.contains("basePath:"));
/// ```
pub fn serialize_yaml(doc: &SwaggerDocument) -> Result<String> {
    debug!("Serializing document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize document to YAML")
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// An existing file is overwritten.
///
/// # Arguments
///
/// * `content` - Serialized document text
/// * `path` - Destination file
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
