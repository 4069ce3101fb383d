//! Prototype-free record composition.
//!
//! Records are open bags of fields. [`compose`] merges any number of bags
//! into a fresh record, last bag winning. Behaviors stored as fields take
//! the record they are invoked on as an explicit argument, so a behavior
//! inherited through composition reads the composed record.

mod behavior;
mod compose;
mod error;
mod record;
mod value;

pub use behavior::{expect_arity, number_arg, Behavior};
pub use compose::{compose, compose_pair};
pub use error::RecordError;
pub use record::Record;
pub use value::{format_number, SharedList, SharedMap, Value, ValueKind};
