//! Built-in category blueprints

use record_compose::{Behavior, Record, Value};

pub fn book_blueprint() -> Record {
    Record::new()
        .with("category", "book")
        .with("format", "paperback")
        .with(
            "read",
            Behavior::from_fn(|this| Ok(Value::Text(format!("Reading {}...", this.require("title")?)))),
        )
}

pub fn electronics_blueprint() -> Record {
    Record::new()
        .with("category", "electronics")
        .with("warranty", "1 year")
        .with(
            "power_on",
            Behavior::from_fn(|this| {
                Ok(Value::Text(format!(
                    "{} {} is powering on.",
                    this.require("brand")?,
                    this.require("model")?
                )))
            }),
        )
}

pub fn clothing_blueprint() -> Record {
    Record::new()
        .with("category", "clothing")
        .with("size", "M")
        .with(
            "wear",
            Behavior::from_fn(|this| {
                Ok(Value::Text(format!(
                    "Wearing the {} in size {}.",
                    this.require("name")?,
                    this.require("size")?
                )))
            }),
        )
}

/// All built-in blueprints by name.
pub fn builtin_blueprints() -> Vec<(&'static str, Record)> {
    vec![
        ("book", book_blueprint()),
        ("electronics", electronics_blueprint()),
        ("clothing", clothing_blueprint()),
    ]
}
