//! Callable record fields
//!
//! A behavior never captures the record it was defined on. The record is
//! passed in at call time, so a behavior copied into another record by
//! composition reads that record's fields.

use std::fmt;
use std::rc::Rc;

use crate::error::RecordError;
use crate::record::Record;
use crate::value::{Value, ValueKind};

type BehaviorFn = dyn Fn(&Record, &[Value]) -> Result<Value, RecordError>;

/// A function stored as a record field.
///
/// Cloning is cheap and yields a handle to the same function.
#[derive(Clone)]
pub struct Behavior {
    func: Rc<BehaviorFn>,
}

impl Behavior {
    /// Wrap a function taking the holding record and the call arguments.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> Result<Value, RecordError> + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// Wrap a function that ignores arguments and only reads the record.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, RecordError> + 'static,
    {
        Self::new(move |this, _args| func(this))
    }

    /// Invoke against `this`.
    pub fn call(&self, this: &Record, args: &[Value]) -> Result<Value, RecordError> {
        (self.func)(this, args)
    }

    /// Whether two handles point at the same function.
    pub fn ptr_eq(&self, other: &Behavior) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Behavior(..)")
    }
}

/// Check that exactly `expected` arguments were passed.
pub fn expect_arity(args: &[Value], expected: usize) -> Result<(), RecordError> {
    if args.len() != expected {
        return Err(RecordError::Arity {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Read argument `index` as a number.
pub fn number_arg(args: &[Value], index: usize) -> Result<f64, RecordError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(RecordError::InvalidArgument {
            index,
            expected: ValueKind::Number,
            found: other.kind(),
        }),
        None => Err(RecordError::Arity {
            expected: index + 1,
            got: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_receives_holder() {
        let greet = Behavior::from_fn(|this| Ok(format!("Hi, I am {}", this.text("name")?).into()));
        let alice = Record::new().with("name", "Alice");
        let bob = Record::new().with("name", "Bob");

        assert_eq!(greet.call(&alice, &[]).unwrap(), Value::from("Hi, I am Alice"));
        assert_eq!(greet.call(&bob, &[]).unwrap(), Value::from("Hi, I am Bob"));
    }

    #[test]
    fn test_clone_shares_function() {
        let a = Behavior::from_fn(|_| Ok(Value::Bool(true)));
        let b = a.clone();
        let c = Behavior::from_fn(|_| Ok(Value::Bool(true)));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_number_arg_errors() {
        let args = vec![Value::from("ten")];
        assert_eq!(
            number_arg(&args, 0),
            Err(RecordError::InvalidArgument {
                index: 0,
                expected: ValueKind::Number,
                found: ValueKind::Text,
            })
        );
        assert_eq!(
            number_arg(&[], 0),
            Err(RecordError::Arity { expected: 1, got: 0 })
        );
        assert_eq!(number_arg(&[Value::from(20)], 0), Ok(20.0));
    }

    #[test]
    fn test_expect_arity() {
        assert!(expect_arity(&[], 0).is_ok());
        assert_eq!(
            expect_arity(&[Value::from(1), Value::from(2)], 1),
            Err(RecordError::Arity { expected: 1, got: 2 })
        );
    }
}
