//! Named-field access for key selectors.
//!
//! This module provides the [`Record`] trait, which is implemented by the
//! `#[derive(Record)]` macro, and the [`field`] helper that turns a field
//! name into a key function.

use crate::value::Value;

/// Types whose fields can be read by name.
///
/// This trait is typically derived using `#[derive(Record)]` (with the
/// `derive` feature), but can also be implemented manually.
///
/// # Derive Usage
///
/// ```ignore
/// use seqwise::{field, Record};
///
/// #[derive(Record, Clone)]
/// struct Task {
///     name: String,
///     priority: u8,
///     #[record(skip)]
///     notes: Vec<String>,
/// }
///
/// let ordered = seqwise::from(tasks)
///     .order_by_descending(field(Task::PRIORITY))
///     .then_by(field(Task::NAME))
///     .to_vec()?;
/// ```
///
/// # Manual Implementation
///
/// ```
/// use seqwise::{Record, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Record for Task {
///     fn field_value(&self, field: &str) -> Value {
///         match field {
///             "name" => Value::from(&self.name),
///             "priority" => Value::from(self.priority),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::Null`] when there is no such
    /// field.
    fn field_value(&self, field: &str) -> Value;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value {
        (**self).field_value(field)
    }
}

impl Record for Value {
    fn field_value(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or_default()
    }
}

impl Record for serde_json::Value {
    fn field_value(&self, field: &str) -> Value {
        self.get(field).cloned().map(Value::from).unwrap_or_default()
    }
}

/// Conversion of a whole record into a [`Value`].
///
/// The derive produces a `Value::Map` with one entry per non-skipped field,
/// in declaration order.
pub trait ToValue {
    /// Converts `self` into a value.
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

/// Returns a key function reading the named field of a [`Record`].
///
/// # Example
///
/// ```
/// use seqwise::{field, Value};
///
/// let people = vec![
///     Value::map([("name", Value::from("Bea")), ("age", Value::from(41))]),
///     Value::map([("name", Value::from("Al")), ("age", Value::from(29))]),
/// ];
///
/// let youngest = seqwise::from(people).order_by(field("age")).first()?;
/// assert_eq!(youngest.get("name"), Some(&Value::from("Al")));
/// # Ok::<(), seqwise::QueryError>(())
/// ```
pub fn field<R: Record>(name: impl Into<String>) -> impl Fn(&R) -> Value {
    let name = name.into();
    move |record: &R| record.field_value(&name)
}
