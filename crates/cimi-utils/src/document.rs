//! document representation and loading
//!
//! A [Document] is a plain parsed tree of mappings, sequences and scalars. Mappings keep the
//! order in which their keys were parsed, which makes "first attribute" well defined for
//! [crate::reconcile::has_extra].
//!
//! Documents are read from JSON, or from YAML when the file extension says so.
use std::path::Path;

pub type Document = serde_json::Value;
pub type Object = serde_json::Map<String, Document>;

/// Serialized form of a [Document]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Guess the format from a file extension, defaulting to [Format::Json]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

pub fn parse(contents: &str, format: Format) -> Result<Document, LoadError> {
    Ok(match format {
        Format::Json => serde_json::from_str(contents)?,
        Format::Yaml => serde_yaml::from_str(contents)?,
    })
}

pub fn load_file(file_path: &Path) -> Result<Document, LoadError> {
    let file_path = file_path.canonicalize()?;
    let format = Format::from_path(&file_path);
    tracing::info!(path=%file_path.display(), ?format, "loading document");

    let file_contents = std::fs::read_to_string(&file_path)?;
    parse(&file_contents, format)
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse json document")]
    JsonParseFailed(#[from] serde_json::Error),
    #[error("Unable to parse yaml document")]
    YamlParseFailed(#[from] serde_yaml::Error),
}

/// Short name of a node's kind, for messages
pub(crate) fn kind_name(node: &Document) -> &'static str {
    match node {
        Document::Null => "null",
        Document::Bool(_) => "boolean",
        Document::Number(_) => "number",
        Document::String(_) => "string",
        Document::Array(_) => "sequence",
        Document::Object(_) => "mapping",
    }
}
