//! Terminal operators.
//!
//! These drain the query (or as much of it as they need) and return a
//! single result. Each call starts a fresh pass.

use std::cmp::Ordering;

use crate::chain::truth;
use crate::compare::{ensure_comparable, Comparator, Natural};
use crate::error::{QueryError, Result};
use crate::query::Query;
use crate::sequence::Sequence;
use crate::value::{Number, Value};

fn numeric(value: Value) -> Result<Number> {
    value
        .to_number()
        .ok_or_else(|| QueryError::type_mismatch("number", value.category().as_str()))
}

fn total(values: impl Iterator<Item = Result<Value>>) -> Result<(Number, usize)> {
    let mut sum = Number::I64(0);
    let mut count = 0;
    for value in values {
        sum = sum.add(numeric(value?)?);
        count += 1;
    }
    Ok((sum, count))
}

fn extreme(
    values: impl Iterator<Item = Result<Value>>,
    keep: Ordering,
    op: &'static str,
) -> Result<Value> {
    let natural = Natural::default();
    let mut best: Option<Value> = None;
    for value in values {
        let value = value?;
        ensure_comparable(&value)?;
        best = match best {
            Some(current) if natural.compare(&value, &current)? != keep => Some(current),
            _ => Some(value),
        };
    }
    best.ok_or(QueryError::EmptySource { op })
}

impl<S: Sequence> Query<S> {
    /// Counts the elements.
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        for item in self.iter() {
            item?;
            count += 1;
        }
        Ok(count)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Sums the elements, which must be numbers or numeric text.
    ///
    /// An empty query sums to `0`. Integer sums stay integral unless they
    /// overflow.
    pub fn sum(&self) -> Result<Number>
    where
        S::Item: Into<Value>,
    {
        total(self.iter().map(|item| item.map(Into::into))).map(|(sum, _)| sum)
    }

    /// Sums a numeric projection of the elements.
    pub fn sum_by<F, K>(&self, selector: F) -> Result<Number>
    where
        F: Fn(&S::Item) -> K,
        K: Into<Value>,
    {
        let values = self.iter().map(|item| item.map(|item| selector(&item).into()));
        total(values).map(|(sum, _)| sum)
    }

    /// Averages the elements, which must be numbers or numeric text.
    ///
    /// Fails with [`QueryError::EmptySource`] on an empty query.
    pub fn average(&self) -> Result<f64>
    where
        S::Item: Into<Value>,
    {
        mean(total(self.iter().map(|item| item.map(Into::into)))?)
    }

    /// Averages a numeric projection of the elements.
    pub fn average_by<F, K>(&self, selector: F) -> Result<f64>
    where
        F: Fn(&S::Item) -> K,
        K: Into<Value>,
    {
        let values = self.iter().map(|item| item.map(|item| selector(&item).into()));
        mean(total(values)?)
    }

    // ========================================================================
    // Extremes
    // ========================================================================

    /// Returns the smallest element.
    ///
    /// Elements must be numbers, text or timestamps, and mutually
    /// comparable. Of several equal minima the first wins.
    pub fn min(&self) -> Result<Value>
    where
        S::Item: Into<Value>,
    {
        extreme(self.iter().map(|item| item.map(Into::into)), Ordering::Less, "min")
    }

    /// Returns the smallest projected value.
    pub fn min_by<F, K>(&self, selector: F) -> Result<Value>
    where
        F: Fn(&S::Item) -> K,
        K: Into<Value>,
    {
        let values = self.iter().map(|item| item.map(|item| selector(&item).into()));
        extreme(values, Ordering::Less, "min")
    }

    /// Returns the largest element. See [`min`](Query::min).
    pub fn max(&self) -> Result<Value>
    where
        S::Item: Into<Value>,
    {
        extreme(self.iter().map(|item| item.map(Into::into)), Ordering::Greater, "max")
    }

    /// Returns the largest projected value.
    pub fn max_by<F, K>(&self, selector: F) -> Result<Value>
    where
        F: Fn(&S::Item) -> K,
        K: Into<Value>,
    {
        let values = self.iter().map(|item| item.map(|item| selector(&item).into()));
        extreme(values, Ordering::Greater, "max")
    }

    // ========================================================================
    // Quantifiers
    // ========================================================================

    /// Returns `true` if every element satisfies `predicate`, and for an
    /// empty query.
    pub fn all<F, P>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        for item in self.iter() {
            if !truth(predicate(&item?))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns `true` if the query has at least one element.
    pub fn any(&self) -> Result<bool> {
        Ok(self.iter().next().transpose()?.is_some())
    }

    /// Returns `true` if at least one element satisfies `predicate`.
    pub fn any_where<F, P>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        Ok(self.first_or_none_where(predicate)?.is_some())
    }

    // ========================================================================
    // Element access
    // ========================================================================

    /// Returns the only element.
    ///
    /// Fails with [`QueryError::NotFound`] on an empty query and
    /// [`QueryError::AmbiguousMatch`] when there is more than one element.
    pub fn single(&self) -> Result<S::Item> {
        self.single_or_none()?.ok_or(QueryError::NotFound)
    }

    /// Returns the only element satisfying `predicate`.
    pub fn single_where<F, P>(&self, predicate: F) -> Result<S::Item>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        self.single_or_none_where(predicate)?
            .ok_or(QueryError::NotFound)
    }

    /// Returns the only element, or `None` on an empty query.
    ///
    /// More than one element is still an error.
    pub fn single_or_none(&self) -> Result<Option<S::Item>> {
        self.single_or_none_where(|_| true)
    }

    /// Returns the only element satisfying `predicate`, or `None`.
    pub fn single_or_none_where<F, P>(&self, predicate: F) -> Result<Option<S::Item>>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        let mut found = None;
        for item in self.iter() {
            let item = item?;
            if truth(predicate(&item))? {
                if found.is_some() {
                    return Err(QueryError::AmbiguousMatch);
                }
                found = Some(item);
            }
        }
        Ok(found)
    }

    /// Returns the first element.
    pub fn first(&self) -> Result<S::Item> {
        self.first_or_none()?.ok_or(QueryError::NotFound)
    }

    /// Returns the first element satisfying `predicate`.
    pub fn first_where<F, P>(&self, predicate: F) -> Result<S::Item>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        self.first_or_none_where(predicate)?
            .ok_or(QueryError::NotFound)
    }

    /// Returns the first element, or `None` on an empty query.
    pub fn first_or_none(&self) -> Result<Option<S::Item>> {
        self.iter().next().transpose()
    }

    /// Returns the first element satisfying `predicate`, or `None`.
    pub fn first_or_none_where<F, P>(&self, predicate: F) -> Result<Option<S::Item>>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        for item in self.iter() {
            let item = item?;
            if truth(predicate(&item))? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// Returns the last element.
    pub fn last(&self) -> Result<S::Item> {
        self.last_or_none()?.ok_or(QueryError::NotFound)
    }

    /// Returns the last element satisfying `predicate`.
    pub fn last_where<F, P>(&self, predicate: F) -> Result<S::Item>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        self.last_or_none_where(predicate)?
            .ok_or(QueryError::NotFound)
    }

    /// Returns the last element, or `None` on an empty query.
    pub fn last_or_none(&self) -> Result<Option<S::Item>> {
        let mut last = None;
        for item in self.iter() {
            last = Some(item?);
        }
        Ok(last)
    }

    /// Returns the last element satisfying `predicate`, or `None`.
    pub fn last_or_none_where<F, P>(&self, predicate: F) -> Result<Option<S::Item>>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        let mut last = None;
        for item in self.iter() {
            let item = item?;
            if truth(predicate(&item))? {
                last = Some(item);
            }
        }
        Ok(last)
    }

    /// Returns the element at a zero-based position.
    ///
    /// Fails with [`QueryError::IndexOutOfRange`] for a negative index or
    /// one at or past the end.
    pub fn element_at(&self, index: i64) -> Result<S::Item> {
        self.element_at_or_none(index)?
            .ok_or(QueryError::IndexOutOfRange { index })
    }

    /// Returns the element at a zero-based position, or `None` when the
    /// position is out of range.
    pub fn element_at_or_none(&self, index: i64) -> Result<Option<S::Item>> {
        let Ok(target) = usize::try_from(index) else {
            return Ok(None);
        };
        for (position, item) in self.iter().enumerate() {
            let item = item?;
            if position == target {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

fn mean((sum, count): (Number, usize)) -> Result<f64> {
    if count == 0 {
        return Err(QueryError::EmptySource { op: "average" });
    }
    Ok(sum.to_f64() / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::from;
    use crate::value::Timestamp;

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(from(Vec::<i32>::new()).sum().unwrap(), Number::I64(0));
    }

    #[test]
    fn sum_mixes_integers_and_floats() {
        let sum = from(vec![Value::from(4), Value::from(9), Value::from(100.77)])
            .sum()
            .unwrap();
        assert!((sum.to_f64() - 113.77).abs() < 1e-9);
    }

    #[test]
    fn sum_promotes_on_overflow() {
        let sum = from(vec![i64::MAX, i64::MAX]).sum().unwrap();
        assert_eq!(sum, Number::U64(u64::MAX - 1));
    }

    #[test]
    fn sum_rejects_non_numbers() {
        let err = from(vec![Value::from(1), Value::from("a")]).sum().unwrap_err();
        assert_eq!(err, QueryError::type_mismatch("number", "text"));
    }

    #[test]
    fn average_accepts_numeric_text() {
        let average = from(vec![Value::from(2), Value::from("4")]).average().unwrap();
        assert_eq!(average, 3.0);
    }

    #[test]
    fn average_of_empty_fails() {
        assert_eq!(
            from(Vec::<f64>::new()).average(),
            Err(QueryError::EmptySource { op: "average" })
        );
    }

    #[test]
    fn min_and_max() {
        let query = from(vec![6, -100, 40]);
        assert_eq!(query.min().unwrap(), Value::from(-100));
        assert_eq!(query.max().unwrap(), Value::from(40));
    }

    #[test]
    fn min_and_max_of_timestamps() {
        let query = from(vec![Timestamp(20), Timestamp(10), Timestamp(30)]);
        assert_eq!(query.min().unwrap(), Value::from(Timestamp(10)));
        assert_eq!(query.max().unwrap(), Value::from(Timestamp(30)));
    }

    #[test]
    fn min_checks_even_a_single_element() {
        let err = from(vec![Value::Null]).min().unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
        assert!(from(vec![Value::from(1), Value::from("abc")]).max().is_err());
        assert_eq!(
            from(Vec::<i32>::new()).max(),
            Err(QueryError::EmptySource { op: "max" })
        );
    }

    #[test]
    fn first_of_equal_extremes_wins() {
        let query = from(vec!["b", "A", "a"]);
        assert_eq!(query.min().unwrap(), Value::from("A"));
    }

    #[test]
    fn projections() {
        let query = from(vec![("a", 3), ("b", 1)]);
        assert_eq!(query.sum_by(|p| p.1).unwrap(), Number::I64(4));
        assert_eq!(query.average_by(|p| p.1).unwrap(), 2.0);
        assert_eq!(query.min_by(|p| p.1).unwrap(), Value::from(1));
        assert_eq!(query.max_by(|p| p.0).unwrap(), Value::from("b"));
    }

    #[test]
    fn quantifiers() {
        let empty = from(Vec::<i32>::new());
        assert!(empty.all(|_| false).unwrap());
        assert!(!empty.any().unwrap());
        assert!(!empty.any_where(|_| true).unwrap());

        let query = from(vec![1, 2, 3]);
        assert!(query.all(|n| *n > 0).unwrap());
        assert!(!query.all(|n| *n > 1).unwrap());
        assert!(query.any_where(|n| *n == 2).unwrap());
        assert!(query.all(|_| "yes").is_err());
    }

    #[test]
    fn single_variants() {
        assert_eq!(from(vec![77]).single().unwrap(), 77);
        assert_eq!(from(vec![1, 2]).single(), Err(QueryError::AmbiguousMatch));
        assert_eq!(from(Vec::<i32>::new()).single(), Err(QueryError::NotFound));
        assert_eq!(from(Vec::<i32>::new()).single_or_none().unwrap(), None);
        assert_eq!(
            from(vec![1, 2]).single_or_none(),
            Err(QueryError::AmbiguousMatch)
        );
        assert_eq!(from(vec![1, 2, 3]).single_where(|n| *n == 2).unwrap(), 2);
    }

    #[test]
    fn first_and_last_variants() {
        let query = from(vec![1, 2, 3, 4]);
        assert_eq!(query.first().unwrap(), 1);
        assert_eq!(query.last().unwrap(), 4);
        assert_eq!(query.first_where(|n| n % 2 == 0).unwrap(), 2);
        assert_eq!(query.last_where(|n| n % 2 == 1).unwrap(), 3);
        assert_eq!(query.first_or_none_where(|n| *n > 10).unwrap(), None);
        assert_eq!(query.last_where(|n| *n > 10), Err(QueryError::NotFound));

        let empty = from(Vec::<i32>::new());
        assert_eq!(empty.first(), Err(QueryError::NotFound));
        assert_eq!(empty.last_or_none().unwrap(), None);
    }

    #[test]
    fn element_at_bounds() {
        let query = from(vec!["a", "b"]);
        assert_eq!(query.element_at(1).unwrap(), "b");
        assert_eq!(
            query.element_at(2),
            Err(QueryError::IndexOutOfRange { index: 2 })
        );
        assert_eq!(
            query.element_at(-1),
            Err(QueryError::IndexOutOfRange { index: -1 })
        );
        assert_eq!(query.element_at_or_none(2).unwrap(), None);
        assert_eq!(query.element_at_or_none(-1).unwrap(), None);
    }

    #[test]
    fn count_includes_every_element() {
        assert_eq!(from(vec![1, 2, 3]).count().unwrap(), 3);
        assert_eq!(from(Vec::<u8>::new()).count().unwrap(), 0);
    }
}
