//! Products built by composition
//!
//! Every product is `compose(base, blueprint, overrides)`. The base carries
//! the shared fields and behaviors, a blueprint adds category defaults and
//! one category behavior, and the overrides pin the final values.

mod blueprints;

pub use blueprints::{book_blueprint, builtin_blueprints, clothing_blueprint, electronics_blueprint};

use record_compose::{compose, format_number, Behavior, Record, RecordError, Value};
use tracing::debug;

use crate::pricing::discount_behavior;

/// Default category for products without a blueprint.
pub const DEFAULT_CATEGORY: &str = "general";

/// The shared base every product starts from.
pub fn base_product() -> Record {
    Record::new()
        .with("category", DEFAULT_CATEGORY)
        .with("in_stock", true)
        .with("price", 0)
        .with("get_label", label_behavior())
        .with("discounted_price", discount_behavior())
}

/// Human-facing name of a product.
///
/// First present of `name`, `title`, `brand` + `model`; otherwise derived
/// from the category. Any data value counts; behaviors are skipped.
pub fn display_name(this: &Record) -> Result<String, RecordError> {
    for field in ["name", "title"] {
        match this.get(field) {
            Some(value) if !value.is_behavior() => return Ok(value.to_string()),
            _ => {}
        }
    }
    if let (Some(brand), Some(model)) = (this.get("brand"), this.get("model")) {
        return Ok(format!("{} {}", brand, model));
    }
    Ok(format!("{} product", this.require("category")?))
}

/// `"{display name} - ${price}"`
pub fn label_behavior() -> Behavior {
    Behavior::from_fn(|this| {
        let price = this.number("price")?;
        Ok(Value::Text(format!(
            "{} - ${}",
            display_name(this)?,
            format_number(price)
        )))
    })
}

/// Product-only detail line, attached after creation.
pub fn describe_behavior() -> Behavior {
    Behavior::from_fn(|this| {
        Ok(Value::Text(format!(
            "Product: {} {} ({}) - ${}",
            this.require("brand")?,
            this.require("model")?,
            this.require("category")?,
            format_number(this.number("price")?)
        )))
    })
}

/// Creates products from a fixed base.
#[derive(Debug, Clone)]
pub struct ProductFactory {
    base: Record,
}

impl Default for ProductFactory {
    fn default() -> Self {
        Self::new(base_product())
    }
}

impl ProductFactory {
    pub fn new(base: Record) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Record {
        &self.base
    }

    /// `compose(base, blueprint, overrides)`
    pub fn create(&self, blueprint: &Record, overrides: &Record) -> Record {
        let product = compose([&self.base, blueprint, overrides]);
        let category = product.get("category").map(Value::to_string).unwrap_or_default();
        debug!(%category, fields = product.len(), "created product");
        product
    }

    /// A product from the base and overrides only.
    pub fn create_plain(&self, overrides: &Record) -> Record {
        self.create(&Record::new(), overrides)
    }
}
