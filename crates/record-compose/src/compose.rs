//! Record composition
//!
//! Merge semantics:
//! - Fields: union of all bags, last bag wins on collision
//! - Lists and maps: the handle is copied, the contents stay shared
//! - Behaviors: copied like any other value, bound to the holder at call time
//! - Field kinds are not checked; any value may override any other

use tracing::debug;

use crate::record::Record;

/// Shallow-merge `bags` left to right into a fresh record.
///
/// No input bag is modified. Zero bags yield an empty record.
pub fn compose<'a, I>(bags: I) -> Record
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut result = Record::new();
    let mut count = 0usize;
    for bag in bags {
        for (name, value) in bag.iter() {
            result.set(name, value.clone());
        }
        count += 1;
    }
    debug!(bags = count, fields = result.len(), "composed record");
    result
}

/// Compose two bags, `overlay` winning.
pub fn compose_pair(base: &Record, overlay: &Record) -> Record {
    compose([base, overlay])
}
