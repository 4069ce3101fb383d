//! Shared test fixtures

use std::path::{Path, PathBuf};

/// Path to the catalog file fixture
pub fn catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.toml")
}
