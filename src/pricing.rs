//! Discount computation
//!
//! The only bounds check in the catalog: a percentage outside `[0, 100]`
//! leaves the price unchanged instead of failing.

use record_compose::{expect_arity, number_arg, Behavior, Value};
use tracing::warn;

/// Apply a percentage discount to `price`.
///
/// Out-of-range (or NaN) percentages return `price` unchanged.
pub fn discounted_price(price: f64, percent: f64) -> f64 {
    if !(0.0..=100.0).contains(&percent) {
        warn!(price, percent, "discount percentage out of range, keeping original price");
        return price;
    }
    price - price * (percent / 100.0)
}

/// Behavior reading `price` from its holder and taking one numeric argument.
pub fn discount_behavior() -> Behavior {
    Behavior::new(|this, args| {
        expect_arity(args, 1)?;
        let percent = number_arg(args, 0)?;
        Ok(Value::Number(discounted_price(this.number("price")?, percent)))
    })
}
