//! Catalog snapshot for CLI output

use chrono::{DateTime, Utc};
use record_compose::Record;
use serde::Serialize;

/// One product in a [`CatalogReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ProductEntry {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,

    /// Result of the product's `get_label` behavior
    pub label: String,

    /// Names of the callable fields
    pub behaviors: Vec<String>,

    /// Data fields (behaviors are not serialized)
    pub fields: Record,
}

/// Catalog snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub generated_at: DateTime<Utc>,
    pub base: Record,
    pub blueprints: Vec<String>,
    pub products: Vec<ProductEntry>,
}

impl CatalogReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Blueprints: {}", self.blueprints.join(", ")));
        lines.push(format!("Products: {}", self.products.len()));
        for entry in &self.products {
            let blueprint = entry.blueprint.as_deref().unwrap_or("-");
            lines.push(format!("  {} [{}] {}", entry.id, blueprint, entry.label));
        }
        lines.join("\n")
    }
}
