//! Catalog configuration
//!
//! Catalog files are TOML. Layers, lowest precedence first:
//! 1. Built-in base product
//! 2. `[base]` table of the catalog file
//! 3. Blueprint, then product overrides (per product)
//! 4. CLI `--set` overrides (applied to every product)

mod file;
mod overrides;
mod source;

pub use file::{table_to_record, toml_to_value, BlueprintSection, CatalogFile, ProductSection};
pub use overrides::{parse_override, parse_overrides, parse_value};
pub use source::{CatalogSource, LoadedCatalog};

use std::io;

use crate::catalog::CatalogError;
use crate::template::TemplateError;

/// Error types for catalog configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid template for `{behavior}` in {context}: {source}")]
    TemplateError {
        context: String,
        behavior: String,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    CatalogError(#[from] CatalogError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
