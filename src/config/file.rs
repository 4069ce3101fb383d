//! Catalog file format
//!
//! ```toml
//! [base]
//! category = "general"
//!
//! [blueprints.book]
//! category = "book"
//! [blueprints.book.behaviors]
//! read = "Reading ${title}..."
//!
//! [[products]]
//! id = "west"
//! blueprint = "book"
//! [products.overrides]
//! title = "West"
//! price = 24.99
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use record_compose::{compose_pair, Record, Value};
use serde::Deserialize;
use tracing::debug;

use super::ConfigError;
use crate::catalog::Catalog;
use crate::product::{base_product, ProductFactory};
use crate::template::Template;

/// A table of data fields plus template behaviors.
///
/// Used for `[base]` and each `[blueprints.<name>]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlueprintSection {
    /// Behavior name -> template source
    #[serde(default)]
    pub behaviors: IndexMap<String, String>,

    /// Every other key is a data field
    #[serde(flatten)]
    pub fields: toml::Table,
}

/// One `[[products]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSection {
    pub id: String,

    /// Blueprint name; the product is built from the base alone when absent
    #[serde(default)]
    pub blueprint: Option<String>,

    #[serde(default)]
    pub overrides: toml::Table,

    /// Product-only behaviors, attached after composition
    #[serde(default)]
    pub behaviors: IndexMap<String, String>,
}

/// Parsed catalog file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub base: Option<BlueprintSection>,

    #[serde(default)]
    pub blueprints: IndexMap<String, BlueprintSection>,

    #[serde(default)]
    pub products: Vec<ProductSection>,
}

impl CatalogFile {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Build the catalog.
    ///
    /// File blueprints replace built-in blueprints of the same name. Template
    /// behaviors that reach each other in a cycle on the base or on any
    /// product are rejected.
    pub fn build(&self) -> Result<Catalog, ConfigError> {
        let mut base = base_product();
        let mut base_refs = TemplateRefs::new();
        if let Some(section) = &self.base {
            let (record, refs) = section.build_record("[base]")?;
            base = compose_pair(&base, &record);
            base_refs = refs;
        }
        check_cycles(&base_refs, "[base]")?;

        let mut catalog = Catalog::with_builtin_blueprints(ProductFactory::new(base));
        let mut blueprint_refs: IndexMap<&str, TemplateRefs> = IndexMap::new();
        for (name, section) in &self.blueprints {
            let (record, refs) = section.build_record(&format!("blueprint `{}`", name))?;
            if catalog.insert_blueprint(name.as_str(), record).is_some() {
                debug!(blueprint = %name, "catalog file replaces built-in blueprint");
            }
            blueprint_refs.insert(name.as_str(), refs);
        }

        for product in &self.products {
            product.validate()?;
            let context = format!("product `{}`", product.id);
            let overrides = table_to_record(product.overrides.clone());
            let record = catalog.add_product(&product.id, product.blueprint.as_deref(), &overrides)?;
            let product_refs = attach_behaviors(record, &product.behaviors, &context)?;

            // Same layering as the composed record: base, blueprint,
            // overrides, product behaviors.
            let mut refs = base_refs.clone();
            if let Some(name) = product.blueprint.as_deref() {
                if let Some(blueprint) = catalog.blueprint(name) {
                    for key in blueprint.keys() {
                        refs.shift_remove(key);
                    }
                }
                if let Some(layer) = blueprint_refs.get(name) {
                    refs.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
            for key in product.overrides.keys() {
                refs.shift_remove(key);
            }
            refs.extend(product_refs);
            check_cycles(&refs, &context)?;
        }

        debug!(
            blueprints = self.blueprints.len(),
            products = catalog.len(),
            "built catalog from file"
        );
        Ok(catalog)
    }
}

impl BlueprintSection {
    pub fn to_record(&self, context: &str) -> Result<Record, ConfigError> {
        self.build_record(context).map(|(record, _)| record)
    }

    fn build_record(&self, context: &str) -> Result<(Record, TemplateRefs), ConfigError> {
        let mut record = table_to_record(self.fields.clone());
        let refs = attach_behaviors(&mut record, &self.behaviors, context)?;
        Ok((record, refs))
    }
}

impl ProductSection {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "product id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Template behavior name -> fields its placeholders read
type TemplateRefs = IndexMap<String, Vec<String>>;

fn attach_behaviors(
    record: &mut Record,
    behaviors: &IndexMap<String, String>,
    context: &str,
) -> Result<TemplateRefs, ConfigError> {
    let mut refs = TemplateRefs::new();
    for (name, source) in behaviors {
        let template = Template::parse(source).map_err(|source| ConfigError::TemplateError {
            context: context.to_string(),
            behavior: name.clone(),
            source,
        })?;
        refs.insert(name.clone(), template.fields().map(str::to_string).collect());
        record.set(name.as_str(), template.into_behavior());
    }
    Ok(refs)
}

fn check_cycles(refs: &TemplateRefs, context: &str) -> Result<(), ConfigError> {
    match find_cycle(refs) {
        Some(cycle) => Err(ConfigError::ValidationError(format!(
            "behaviors in {} form a cycle: {}",
            context,
            cycle.join(" -> ")
        ))),
        None => Ok(()),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// First cycle between template behaviors, as a path that ends where it
/// started. Fields that are not templates end a path.
fn find_cycle(refs: &TemplateRefs) -> Option<Vec<String>> {
    fn visit<'a>(
        name: &'a str,
        refs: &'a TemplateRefs,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match marks.get(name) {
            Some(Mark::Done) => return None,
            Some(Mark::Visiting) => {
                let start = path.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Some(cycle);
            }
            None => {}
        }
        let fields = refs.get(name)?;

        marks.insert(name, Mark::Visiting);
        path.push(name);
        for field in fields {
            if let Some(cycle) = visit(field, refs, marks, path) {
                return Some(cycle);
            }
        }
        path.pop();
        marks.insert(name, Mark::Done);
        None
    }

    let mut marks = HashMap::new();
    let mut path = Vec::new();
    refs.keys()
        .find_map(|name| visit(name, refs, &mut marks, &mut path))
}

/// Convert a TOML value into a field value.
pub fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Text(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Text(dt.to_string()),
        toml::Value::Array(items) => Value::list(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::map(table_to_record(table)),
    }
}

pub fn table_to_record(table: toml::Table) -> Record {
    table
        .into_iter()
        .map(|(name, value)| (name, toml_to_value(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::template::TemplateError;

    const SAMPLE: &str = r#"
[base]
currency = "USD"

[blueprints.magazine]
category = "online"
title = "Forbes"
[blueprints.magazine.behaviors]
read = "Reading online ${title}..."

[[products]]
id = "forbes"
blueprint = "magazine"
[products.overrides]
price = 8.99

[[products]]
id = "nokia"
[products.overrides]
category = "mobile"
brand = "Nokia"
model = "3310"
price = 249.99
colors = ["black", "blue"]
[products.behaviors]
power_on = "${brand} ${model} is powering on."
"#;

    #[test]
    fn test_build_sample() {
        let catalog = CatalogFile::parse(SAMPLE).unwrap().build().unwrap();

        let forbes = catalog.product("forbes").unwrap();
        assert_eq!(forbes.text("currency").unwrap(), "USD");
        assert_eq!(forbes.number("price").unwrap(), 8.99);
        assert_eq!(
            catalog.call("forbes", "read", &[]).unwrap(),
            Value::from("Reading online Forbes...")
        );
        assert_eq!(
            catalog.call("nokia", "power_on", &[]).unwrap(),
            Value::from("Nokia 3310 is powering on.")
        );
        assert_eq!(
            catalog.call("nokia", "get_label", &[]).unwrap(),
            Value::from("Nokia 3310 - $249.99")
        );
        let colors = catalog.product("nokia").unwrap().get("colors").unwrap().as_list().unwrap().borrow().len();
        assert_eq!(colors, 2);
    }

    #[test]
    fn test_builtin_blueprints_available() {
        let file = CatalogFile::parse(
            r#"
[[products]]
id = "tee"
blueprint = "clothing"
[products.overrides]
name = "Tee"
"#,
        )
        .unwrap();
        let catalog = file.build().unwrap();
        assert_eq!(
            catalog.call("tee", "wear", &[]).unwrap(),
            Value::from("Wearing the Tee in size M.")
        );
    }

    #[test]
    fn test_integer_fields_are_numbers() {
        let file = CatalogFile::parse("[base]\nprice = 5\n").unwrap();
        let catalog = file.build().unwrap();
        assert_eq!(catalog.factory().base().number("price").unwrap(), 5.0);
    }

    #[test]
    fn test_unknown_blueprint() {
        let file = CatalogFile::parse("[[products]]\nid = \"x\"\nblueprint = \"garden\"\n").unwrap();
        assert!(matches!(
            file.build(),
            Err(ConfigError::CatalogError(CatalogError::UnknownBlueprint { .. }))
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        let file = CatalogFile::parse("[[products]]\nid = \"x\"\n[[products]]\nid = \"x\"\n").unwrap();
        assert!(matches!(
            file.build(),
            Err(ConfigError::CatalogError(CatalogError::DuplicateProduct(_)))
        ));
    }

    #[test]
    fn test_bad_template() {
        let file = CatalogFile::parse(
            "[blueprints.book.behaviors]\nread = \"Reading ${title\"\n",
        )
        .unwrap();
        match file.build() {
            Err(ConfigError::TemplateError { behavior, source, .. }) => {
                assert_eq!(behavior, "read");
                assert_eq!(source, TemplateError::Unterminated(8));
            }
            other => panic!("expected template error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_self_referencing_behavior() {
        let file = CatalogFile::parse("[base.behaviors]\nloop = \"${loop}\"\n").unwrap();
        assert!(matches!(file.build(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_cycle_across_layers() {
        let file = CatalogFile::parse(
            r#"
[blueprints.loopy.behaviors]
a = "${b}"

[[products]]
id = "p"
blueprint = "loopy"
[products.behaviors]
b = "${a}"
"#,
        )
        .unwrap();
        match file.build() {
            Err(ConfigError::ValidationError(msg)) => {
                assert_eq!(msg, "behaviors in product `p` form a cycle: a -> b -> a");
            }
            other => panic!("expected validation error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_cycle_through_base() {
        let file = CatalogFile::parse(
            r#"
[base.behaviors]
get_label = "${short}"

[[products]]
id = "p"
[products.behaviors]
short = "${get_label}!"
"#,
        )
        .unwrap();
        assert!(matches!(file.build(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_override_breaks_cycle() {
        let file = CatalogFile::parse(
            r#"
[blueprints.loopy.behaviors]
a = "${b}"
b = "${a}"

[[products]]
id = "p"
blueprint = "loopy"
[products.overrides]
b = "plain"
"#,
        )
        .unwrap();
        let catalog = file.build().unwrap();
        assert_eq!(catalog.call("p", "a", &[]).unwrap(), Value::from("plain"));
    }

    #[test]
    fn test_file_blueprint_replaces_builtin() {
        let file = CatalogFile::parse(
            r#"
[blueprints.book]
category = "book"
format = "hardcover"
[blueprints.book.behaviors]
read = "Leafing through ${title}"

[[products]]
id = "west"
blueprint = "book"
[products.overrides]
title = "West"

[[products]]
id = "tee"
blueprint = "clothing"
[products.overrides]
name = "Tee"
"#,
        )
        .unwrap();
        let catalog = file.build().unwrap();

        let west = catalog.product("west").unwrap();
        assert_eq!(west.text("format").unwrap(), "hardcover");
        assert_eq!(
            catalog.call("west", "read", &[]).unwrap(),
            Value::from("Leafing through West")
        );
        assert_eq!(catalog.blueprint("book").unwrap().text("format").unwrap(), "hardcover");

        // Blueprints the file does not name stay built in.
        assert_eq!(catalog.product("tee").unwrap().text("size").unwrap(), "M");
        assert_eq!(
            catalog.blueprint("electronics").unwrap().text("warranty").unwrap(),
            "1 year"
        );
        assert_eq!(
            catalog.blueprint_names().collect::<Vec<_>>(),
            vec!["book", "electronics", "clothing"]
        );
    }

    #[test]
    fn test_empty_product_id() {
        let file = CatalogFile::parse("[[products]]\nid = \" \"\n").unwrap();
        assert!(matches!(file.build(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_top_level_key() {
        assert!(matches!(
            CatalogFile::parse("[widgets]\na = 1\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_toml_to_value_nested() {
        let table: toml::Table = toml::from_str("dims = { width = 10, height = 2.5 }").unwrap();
        let record = table_to_record(table);
        let dims = record.get("dims").unwrap().as_map().unwrap().borrow();
        assert_eq!(dims.number("width").unwrap(), 10.0);
        assert_eq!(dims.number("height").unwrap(), 2.5);
    }
}
