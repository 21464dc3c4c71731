//! Total-order comparison between runtime values.
//!
//! The [`Comparator`] trait is the single notion of order and equality used
//! by the ordering, grouping, distinct and min/max operators. [`Natural`] is
//! the default implementation.

use std::cmp::Ordering;

use crate::error::{QueryError, Result};
use crate::value::{Category, Value};

/// Compares two values, failing when they are not mutually comparable.
pub trait Comparator {
    /// Compares `a` with `b`.
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering>;

    /// Returns `true` when `a` and `b` compare equal.
    fn equals(&self, a: &Value, b: &Value) -> Result<bool> {
        Ok(self.compare(a, b)? == Ordering::Equal)
    }
}

impl<C: Comparator + ?Sized> Comparator for &C {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        (**self).compare(a, b)
    }
}

/// Case sensitivity for text comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Case {
    /// ASCII letters compare without regard to case.
    #[default]
    Insensitive,
    /// Text compares byte by byte.
    Sensitive,
}

/// The natural order of values.
///
/// | Operands | Rule |
/// |----------|------|
/// | text, text | lexicographic, case-insensitive by default |
/// | number (or numeric text), number | arithmetic |
/// | timestamp, timestamp | chronological |
/// | anything else | `TypeMismatch` |
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use seqwise::{Comparator, Natural, Value};
///
/// let natural = Natural::default();
/// assert_eq!(natural.compare(&"abc".into(), &"ABD".into()).unwrap(), Ordering::Less);
/// assert_eq!(natural.compare(&"10".into(), &Value::from(9)).unwrap(), Ordering::Greater);
/// assert!(natural.compare(&"abc".into(), &Value::from(1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Natural {
    case: Case,
}

impl Natural {
    /// A natural comparator that compares text case-sensitively.
    pub fn case_sensitive() -> Self {
        Natural {
            case: Case::Sensitive,
        }
    }

    /// A natural comparator with the given text case handling.
    pub fn with_case(case: Case) -> Self {
        Natural { case }
    }

    /// Returns the text case handling.
    pub fn case(&self) -> Case {
        self.case
    }

    fn compare_text(&self, a: &str, b: &str) -> Ordering {
        match self.case {
            Case::Sensitive => a.cmp(b),
            Case::Insensitive => a
                .bytes()
                .map(|c| c.to_ascii_lowercase())
                .cmp(b.bytes().map(|c| c.to_ascii_lowercase())),
        }
    }
}

impl Comparator for Natural {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        match (a, b) {
            (Value::Text(a), Value::Text(b)) => Ok(self.compare_text(a, b)),
            (Value::Number(a), Value::Number(b)) => Ok(a.compare(*b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Ok(a.cmp(b)),

            // Numeric text meets a number
            (Value::Number(_), Value::Text(_)) | (Value::Text(_), Value::Number(_)) => {
                match (a.to_number(), b.to_number()) {
                    (Some(a), Some(b)) => Ok(a.compare(b)),
                    _ => Err(QueryError::type_mismatch(
                        "number",
                        Category::Text.as_str(),
                    )),
                }
            }

            _ => {
                let expected = ensure_comparable(a)?.as_str();
                ensure_comparable(b)?;
                Err(QueryError::type_mismatch(expected, b.category().as_str()))
            }
        }
    }
}

/// Checks that a value belongs to a comparable category (number, text or
/// timestamp) and returns that category.
pub fn ensure_comparable(value: &Value) -> Result<Category> {
    match value.category() {
        category @ (Category::Number | Category::Text | Category::Timestamp) => Ok(category),
        other => Err(QueryError::type_mismatch(
            "number, text or timestamp",
            other.as_str(),
        )),
    }
}
