//! Product catalog
//!
//! Holds named blueprints and the products created from them. Products are
//! scratch data owned by the catalog: any of them may be mutated in place
//! without touching the base, the blueprints or sibling products.

mod builtin;
mod report;

pub use report::{CatalogReport, ProductEntry};

use chrono::Utc;
use indexmap::IndexMap;
use record_compose::{compose_pair, Record, RecordError, Value};
use tracing::debug;

use crate::product::{builtin_blueprints, ProductFactory};

/// Errors from catalog operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("product `{product}` references unknown blueprint `{blueprint}`")]
    UnknownBlueprint { product: String, blueprint: String },

    #[error("unknown product `{0}`")]
    UnknownProduct(String),

    #[error("duplicate product id `{0}`")]
    DuplicateProduct(String),

    #[error("product `{product}`: {source}")]
    Record {
        product: String,
        #[source]
        source: RecordError,
    },
}

/// A product and the blueprint it was created from.
#[derive(Debug, Clone)]
pub struct CatalogProduct {
    pub blueprint: Option<String>,
    pub record: Record,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    factory: ProductFactory,
    blueprints: IndexMap<String, Record>,
    products: IndexMap<String, CatalogProduct>,
}

impl Catalog {
    /// Empty catalog over the given factory.
    pub fn new(factory: ProductFactory) -> Self {
        Self {
            factory,
            blueprints: IndexMap::new(),
            products: IndexMap::new(),
        }
    }

    /// Empty catalog with the built-in blueprints.
    pub fn with_builtin_blueprints(factory: ProductFactory) -> Self {
        let mut catalog = Self::new(factory);
        for (name, blueprint) in builtin_blueprints() {
            catalog.insert_blueprint(name, blueprint);
        }
        catalog
    }

    /// The sample catalog.
    pub fn builtin() -> Self {
        builtin::sample_catalog()
    }

    pub fn factory(&self) -> &ProductFactory {
        &self.factory
    }

    /// Add or replace a blueprint.
    pub fn insert_blueprint(&mut self, name: impl Into<String>, blueprint: Record) -> Option<Record> {
        self.blueprints.insert(name.into(), blueprint)
    }

    pub fn blueprint(&self, name: &str) -> Option<&Record> {
        self.blueprints.get(name)
    }

    pub fn blueprint_names(&self) -> impl Iterator<Item = &str> {
        self.blueprints.keys().map(String::as_str)
    }

    /// Create a product from `blueprint` (or the base alone) and `overrides`.
    pub fn add_product(
        &mut self,
        id: &str,
        blueprint: Option<&str>,
        overrides: &Record,
    ) -> Result<&mut Record, CatalogError> {
        if self.products.contains_key(id) {
            return Err(CatalogError::DuplicateProduct(id.to_string()));
        }

        let record = match blueprint {
            Some(name) => {
                let bp = self.blueprints.get(name).ok_or_else(|| CatalogError::UnknownBlueprint {
                    product: id.to_string(),
                    blueprint: name.to_string(),
                })?;
                self.factory.create(bp, overrides)
            }
            None => self.factory.create_plain(overrides),
        };
        debug!(product = id, blueprint = ?blueprint, "added product");

        let entry = self.products.entry(id.to_string()).or_insert(CatalogProduct {
            blueprint: blueprint.map(str::to_string),
            record,
        });
        Ok(&mut entry.record)
    }

    pub fn product(&self, id: &str) -> Option<&Record> {
        self.products.get(id).map(|p| &p.record)
    }

    pub fn product_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.products.get_mut(id).map(|p| &mut p.record)
    }

    pub fn require_product(&self, id: &str) -> Result<&Record, CatalogError> {
        self.product(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))
    }

    /// Products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = (&str, &CatalogProduct)> {
        self.products.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn set_in_stock(&mut self, id: &str, in_stock: bool) -> Result<(), CatalogError> {
        let product = self
            .product_mut(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))?;
        product.set("in_stock", in_stock);
        Ok(())
    }

    /// Invoke a behavior on a product.
    pub fn call(&self, id: &str, behavior: &str, args: &[Value]) -> Result<Value, CatalogError> {
        self.require_product(id)?
            .call(behavior, args)
            .map_err(|source| CatalogError::Record {
                product: id.to_string(),
                source,
            })
    }

    /// `get_label` of every product, in order.
    pub fn labels(&self) -> Result<Vec<(String, String)>, CatalogError> {
        self.products()
            .map(|(id, _)| {
                let label = self.call(id, "get_label", &[])?;
                Ok((id.to_string(), label.to_string()))
            })
            .collect::<Result<Vec<_>, CatalogError>>()
    }

    /// Compose `overrides` over every product.
    pub fn apply_overrides(&mut self, overrides: &Record) {
        if overrides.is_empty() {
            return;
        }
        for product in self.products.values_mut() {
            product.record = compose_pair(&product.record, overrides);
        }
        debug!(fields = overrides.len(), "applied overrides to all products");
    }

    /// Snapshot of the catalog for output.
    pub fn report(&self) -> Result<CatalogReport, CatalogError> {
        let products = self
            .products()
            .map(|(id, product)| {
                let label = self.call(id, "get_label", &[])?.to_string();
                Ok(ProductEntry {
                    id: id.to_string(),
                    blueprint: product.blueprint.clone(),
                    label,
                    behaviors: product
                        .record
                        .iter()
                        .filter(|(_, v)| v.is_behavior())
                        .map(|(name, _)| name.to_string())
                        .collect(),
                    fields: product.record.clone(),
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(CatalogReport {
            generated_at: Utc::now(),
            base: self.factory.base().clone(),
            blueprints: self.blueprint_names().map(str::to_string).collect(),
            products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::with_builtin_blueprints(ProductFactory::default())
    }

    #[test]
    fn test_add_product_from_blueprint() {
        let mut catalog = catalog();
        catalog
            .add_product(
                "js-book",
                Some("book"),
                &Record::new().with("title", "You Don't Know JS").with("price", 29.99),
            )
            .unwrap();

        let book = catalog.product("js-book").unwrap();
        assert_eq!(book.text("format").unwrap(), "paperback");
        assert_eq!(
            catalog.call("js-book", "read", &[]).unwrap(),
            Value::from("Reading You Don't Know JS...")
        );
    }

    #[test]
    fn test_unknown_blueprint() {
        let mut catalog = catalog();
        let err = catalog.add_product("x", Some("furniture"), &Record::new()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownBlueprint { ref product, ref blueprint } if product == "x" && blueprint == "furniture"
        ));
    }

    #[test]
    fn test_duplicate_product() {
        let mut catalog = catalog();
        catalog.add_product("a", None, &Record::new()).unwrap();
        let err = catalog.add_product("a", None, &Record::new()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(ref id) if id == "a"));
    }

    #[test]
    fn test_set_in_stock_is_local() {
        let mut catalog = catalog();
        catalog.add_product("a", Some("clothing"), &Record::new().with("name", "A")).unwrap();
        catalog.add_product("b", Some("clothing"), &Record::new().with("name", "B")).unwrap();

        catalog.set_in_stock("a", false).unwrap();

        assert!(!catalog.product("a").unwrap().flag("in_stock").unwrap());
        assert!(catalog.product("b").unwrap().flag("in_stock").unwrap());
        assert!(catalog.factory().base().flag("in_stock").unwrap());
        assert!(matches!(
            catalog.set_in_stock("zzz", false),
            Err(CatalogError::UnknownProduct(_))
        ));
    }

    #[test]
    fn test_product_only_behavior() {
        let mut catalog = catalog();
        catalog.add_product("a", Some("book"), &Record::new().with("title", "A")).unwrap();
        catalog.add_product("b", Some("book"), &Record::new().with("title", "B")).unwrap();

        let shelve = record_compose::Behavior::from_fn(|this| {
            Ok(Value::Text(format!("Shelving {}", this.text("title")?)))
        });
        catalog.product_mut("a").unwrap().set("shelve", shelve);

        assert_eq!(catalog.call("a", "shelve", &[]).unwrap(), Value::from("Shelving A"));
        assert!(!catalog.product("b").unwrap().contains("shelve"));
        assert!(!catalog.blueprint("book").unwrap().contains("shelve"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut catalog = catalog();
        catalog.add_product("a", None, &Record::new().with("name", "A").with("price", 5)).unwrap();
        catalog.add_product("b", None, &Record::new().with("name", "B").with("price", 7)).unwrap();

        catalog.apply_overrides(&Record::new().with("price", 1));

        let labels = catalog.labels().unwrap();
        assert_eq!(
            labels,
            vec![
                ("a".to_string(), "A - $1".to_string()),
                ("b".to_string(), "B - $1".to_string()),
            ]
        );
    }

    #[test]
    fn test_call_errors_carry_product() {
        let mut catalog = catalog();
        catalog.add_product("a", None, &Record::new()).unwrap();
        let err = catalog.call("a", "read", &[]).unwrap_err();
        assert_eq!(err.to_string(), "product `a`: field `read` is not defined");
    }

    #[test]
    fn test_report() {
        let catalog = Catalog::builtin();
        let report = catalog.report().unwrap();

        assert_eq!(report.products.len(), catalog.len());
        assert_eq!(report.blueprints, vec!["book", "electronics", "clothing"]);
        let book = &report.products[0];
        assert!(book.behaviors.contains(&"read".to_string()));
        assert!(book.behaviors.contains(&"get_label".to_string()));
    }
}
