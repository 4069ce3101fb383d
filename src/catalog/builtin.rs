//! Sample catalog used when no catalog file is given

use record_compose::Record;

use super::Catalog;
use crate::product::{describe_behavior, ProductFactory};

fn samples() -> Vec<(&'static str, Option<&'static str>, Record)> {
    vec![
        (
            "js-book",
            Some("book"),
            Record::new()
                .with("title", "You Don't Know JS")
                .with("price", 29.99),
        ),
        (
            "iphone-16",
            Some("electronics"),
            Record::new()
                .with("brand", "Apple")
                .with("model", "iPhone 16")
                .with("price", 1199.99),
        ),
        (
            "cool-t-shirt",
            Some("clothing"),
            Record::new()
                .with("name", "Cool T-Shirt")
                .with("price", 19.99)
                .with("size", "L"),
        ),
        (
            "leather-jacket",
            Some("clothing"),
            Record::new()
                .with("name", "Leather Jacket")
                .with("price", 89.99)
                .with("size", "M"),
        ),
        (
            "galaxy-s23",
            None,
            Record::new()
                .with("category", "electronics")
                .with("brand", "Samsung")
                .with("model", "Galaxy S23")
                .with("price", 899),
        ),
    ]
}

pub(super) fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::with_builtin_blueprints(ProductFactory::default());
    for (id, blueprint, overrides) in samples() {
        // Sample ids are unique and reference built-in blueprints.
        if let Err(e) = catalog.add_product(id, blueprint, &overrides) {
            tracing::error!(error = %e, "invalid sample product");
        }
    }
    if let Some(phone) = catalog.product_mut("galaxy-s23") {
        phone.set("describe", describe_behavior());
    }
    catalog
}
