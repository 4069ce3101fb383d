//! Blueprint Catalog - product catalog built by record composition
//!
//! Products are composed from a shared base, a category blueprint and
//! per-product overrides. The composition core lives in the
//! `record-compose` crate; this crate adds pricing, blueprints, template
//! behaviors and TOML catalog files.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod pricing;
pub mod product;
pub mod template;

pub use catalog::{Catalog, CatalogError, CatalogReport};
pub use config::{CatalogFile, ConfigError, LoadedCatalog};
pub use pricing::discounted_price;
pub use product::{base_product, ProductFactory};
pub use record_compose::{compose, Behavior, Record, RecordError, Value};
pub use template::{Template, TemplateError};
