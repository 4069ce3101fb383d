//! Loading catalog files with provenance

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::{CatalogFile, ConfigError};
use crate::catalog::Catalog;

/// Where a catalog came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSource {
    pub path: String,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

/// A catalog built from a file.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub source: CatalogSource,
    pub loaded_at: DateTime<Utc>,
    pub catalog: Catalog,
}

impl LoadedCatalog {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ValidationError(format!("Invalid UTF-8: {}", e)))?;
        let catalog = CatalogFile::parse(&contents)?.build()?;

        info!(
            path = %path.display(),
            digest = %digest,
            products = catalog.len(),
            "loaded catalog"
        );

        Ok(Self {
            source: CatalogSource {
                path: path.to_string_lossy().to_string(),
                digest,
            },
            loaded_at: Utc::now(),
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_with_digest() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[products]]\nid = \"cap\"\n[products.overrides]\nname = \"Cap\"\nprice = 12").unwrap();

        let loaded = LoadedCatalog::load(file.path()).unwrap();
        assert_eq!(loaded.source.digest.len(), 64);
        assert_eq!(loaded.catalog.len(), 1);

        let again = LoadedCatalog::load(file.path()).unwrap();
        assert_eq!(loaded.source, again.source);
    }

    #[test]
    fn test_missing_file() {
        let result = LoadedCatalog::load(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            LoadedCatalog::load(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
