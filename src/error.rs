use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("catalog record is missing mandatory field: {field}")]
    #[diagnostic(help("every catalog record needs file_path, short_descr, long_descr and filter_group"))]
    MissingField { field: &'static str },

    #[error("unresolved placeholder {placeholder} in {path}")]
    UnresolvedPlaceholder { path: String, placeholder: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read catalog file at {0}")]
    CatalogRead(PathBuf),

    #[error("failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("failed to serialize manifest: {0}")]
    Serialize(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
