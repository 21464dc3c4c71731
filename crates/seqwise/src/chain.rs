//! Single-pass operators.
//!
//! Each operator owns its upstream sequence and pulls from it only while it
//! is itself being iterated. None of them buffer the upstream: `distinct`
//! and the set operators keep a per-pass list of what they already yielded.

use std::marker::PhantomData;

use crate::compare::Comparator;
use crate::error::{QueryError, Result};
use crate::sequence::{Iter, Sequence};
use crate::source::{NotIterable, Source, TryIntoSource};
use crate::value::Value;

/// Reads a predicate result, which must be a boolean.
pub(crate) fn truth(result: impl Into<Value>) -> Result<bool> {
    match result.into() {
        Value::Bool(b) => Ok(b),
        other => Err(QueryError::type_mismatch("bool", other.category().as_str())),
    }
}

/// Forwards the elements whose predicate holds.
pub struct Filter<S, F> {
    upstream: S,
    predicate: F,
}

impl<S, F> Filter<S, F> {
    pub(crate) fn new(upstream: S, predicate: F) -> Self {
        Filter {
            upstream,
            predicate,
        }
    }
}

impl<S, F, P> Sequence for Filter<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> P,
    P: Into<Value>,
{
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        Box::new(self.upstream.iter().filter_map(move |item| {
            let item = match item {
                Ok(item) => item,
                Err(err) => return Some(Err(err)),
            };
            match truth((self.predicate)(&item)) {
                Ok(true) => Some(Ok(item)),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            }
        }))
    }
}

/// Projects every element.
pub struct Select<S, F> {
    upstream: S,
    selector: F,
}

impl<S, F> Select<S, F> {
    pub(crate) fn new(upstream: S, selector: F) -> Self {
        Select { upstream, selector }
    }
}

impl<S, F, U> Sequence for Select<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> U,
{
    type Item = U;

    fn iter(&self) -> Iter<'_, U> {
        Box::new(
            self.upstream
                .iter()
                .map(move |item| item.map(&self.selector)),
        )
    }
}

/// Projects every element to a sequence and flattens the results.
pub struct SelectMany<S, F, U> {
    upstream: S,
    selector: F,
    _item: PhantomData<fn() -> U>,
}

impl<S, F, U> SelectMany<S, F, U> {
    pub(crate) fn new(upstream: S, selector: F) -> Self {
        SelectMany {
            upstream,
            selector,
            _item: PhantomData,
        }
    }
}

impl<S, F, R, U> Sequence for SelectMany<S, F, U>
where
    S: Sequence,
    F: Fn(S::Item) -> R,
    R: TryIntoSource<U>,
    U: Clone,
{
    type Item = U;

    fn iter(&self) -> Iter<'_, U> {
        Box::new(self.upstream.iter().flat_map(move |item| {
            let expanded = item.and_then(|item| {
                (self.selector)(item)
                    .try_into_source()
                    .map_err(|NotIterable(actual)| QueryError::type_mismatch("iterable", actual))
            });
            let (items, failure) = match expanded {
                Ok(source) => (Some(source), None),
                Err(err) => (None, Some(Err(err))),
            };
            items.into_iter().flatten().map(Ok).chain(failure)
        }))
    }
}

/// Yields at most the first `count` elements.
pub struct Take<S> {
    upstream: S,
    count: usize,
}

impl<S> Take<S> {
    pub(crate) fn new(upstream: S, count: usize) -> Self {
        Take { upstream, count }
    }
}

impl<S: Sequence> Sequence for Take<S> {
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        Box::new(self.upstream.iter().take(self.count))
    }
}

/// Drops the first `count` elements.
pub struct Skip<S> {
    upstream: S,
    count: usize,
}

impl<S> Skip<S> {
    pub(crate) fn new(upstream: S, count: usize) -> Self {
        Skip { upstream, count }
    }
}

impl<S: Sequence> Sequence for Skip<S> {
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        let mut remaining = self.count;
        // Errors are never skipped over
        Box::new(self.upstream.iter().filter(move |item| {
            if remaining > 0 && item.is_ok() {
                remaining -= 1;
                false
            } else {
                true
            }
        }))
    }
}

/// Appends a second sequence.
pub struct Concat<S: Sequence> {
    upstream: S,
    tail: Source<S::Item>,
}

impl<S: Sequence> Concat<S> {
    pub(crate) fn new(upstream: S, tail: Source<S::Item>) -> Self {
        Concat { upstream, tail }
    }
}

impl<S> Sequence for Concat<S>
where
    S: Sequence,
    S::Item: Clone,
{
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        Box::new(self.upstream.iter().chain(self.tail.iter()))
    }
}

/// Forwards the first occurrence of every distinct element.
pub struct Distinct<S> {
    upstream: S,
}

impl<S> Distinct<S> {
    pub(crate) fn new(upstream: S) -> Self {
        Distinct { upstream }
    }
}

impl<S> Sequence for Distinct<S>
where
    S: Sequence,
    S::Item: PartialEq + Clone,
{
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        let mut seen: Vec<S::Item> = Vec::new();
        Box::new(self.upstream.iter().filter(move |item| match item {
            Ok(item) if seen.contains(item) => false,
            Ok(item) => {
                seen.push(item.clone());
                true
            }
            Err(_) => true,
        }))
    }
}

/// Forwards the first element for every distinct key.
pub struct DistinctBy<S, F, C> {
    upstream: S,
    key: F,
    comparator: C,
}

impl<S, F, C> DistinctBy<S, F, C> {
    pub(crate) fn new(upstream: S, key: F, comparator: C) -> Self {
        DistinctBy {
            upstream,
            key,
            comparator,
        }
    }
}

impl<S, F, K, C> Sequence for DistinctBy<S, F, C>
where
    S: Sequence,
    F: Fn(&S::Item) -> K,
    K: Into<Value>,
    C: Comparator,
{
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        let mut seen: Vec<Value> = Vec::new();
        Box::new(self.upstream.iter().filter_map(move |item| {
            let item = match item {
                Ok(item) => item,
                Err(err) => return Some(Err(err)),
            };
            let key = (self.key)(&item).into();
            for known in &seen {
                match self.comparator.equals(known, &key) {
                    Ok(true) => return None,
                    Ok(false) => {}
                    Err(err) => return Some(Err(err)),
                }
            }
            seen.push(key);
            Some(Ok(item))
        }))
    }
}

/// Which elements a [`SetFilter`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Elements also present in the other sequence.
    Intersect,
    /// Elements absent from the other sequence.
    Diff,
}

/// Filters a sequence by membership in a second one.
///
/// Every kept element is yielded once, at its first appearance.
pub struct SetFilter<S: Sequence> {
    upstream: S,
    other: Source<S::Item>,
    mode: SetMode,
}

impl<S: Sequence> SetFilter<S> {
    pub(crate) fn new(upstream: S, other: Source<S::Item>, mode: SetMode) -> Self {
        SetFilter {
            upstream,
            other,
            mode,
        }
    }
}

impl<S> Sequence for SetFilter<S>
where
    S: Sequence,
    S::Item: PartialEq + Clone,
{
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        let mut yielded: Vec<S::Item> = Vec::new();
        Box::new(self.upstream.iter().filter(move |item| {
            let Ok(item) = item else {
                return true;
            };
            let present = self.other.as_slice().contains(item);
            let wanted = match self.mode {
                SetMode::Intersect => present,
                SetMode::Diff => !present,
            };
            if !wanted || yielded.contains(item) {
                return false;
            }
            yielded.push(item.clone());
            true
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Natural;

    fn drain<S: Sequence>(seq: &S) -> Result<Vec<S::Item>> {
        seq.iter().collect()
    }

    #[test]
    fn filter_requires_boolean_predicates() {
        let filter = Filter::new(Source::from(vec!["1", "2"]), |_: &&str| "NOT A BOOLEAN");
        assert_eq!(
            drain(&filter),
            Err(QueryError::type_mismatch("bool", "text"))
        );
    }

    #[test]
    fn skip_and_take_compose() {
        let source = Source::from(vec!["a", "b", "c", "d", "e", "f"]);
        let window = Take::new(Skip::new(source, 2), 2);
        assert_eq!(drain(&window).unwrap(), vec!["c", "d"]);
    }

    #[test]
    fn skip_past_the_end_is_empty() {
        let skip = Skip::new(Source::from(vec![1, 2]), 7);
        assert!(drain(&skip).unwrap().is_empty());
    }

    #[test]
    fn select_many_flattens_and_rewinds() {
        let source = Source::from(vec![vec!["a", "b"], vec!["c", "d"]]);
        let flat = SelectMany::new(source, |v: Vec<&'static str>| v);
        assert_eq!(drain(&flat).unwrap(), vec!["a", "b", "c", "d"]);
        assert_eq!(drain(&flat).unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn select_many_rejects_scalars() {
        let source = Source::from(vec![Value::from("a1")]);
        let flat = SelectMany::new(source, |v: Value| v);
        assert_eq!(
            drain(&flat),
            Err(QueryError::type_mismatch("iterable", "text"))
        );
    }

    #[test]
    fn distinct_keeps_first_occurrences() {
        let distinct = Distinct::new(Source::from(vec!["a", "b", "a", "b"]));
        assert_eq!(drain(&distinct).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn distinct_by_uses_comparator_equality() {
        let source = Source::from(vec!["A", "a", "b"]);
        let distinct = DistinctBy::new(source, |s: &&'static str| *s, Natural::default());
        assert_eq!(drain(&distinct).unwrap(), vec!["A", "b"]);
    }

    #[test]
    fn set_filters_preserve_first_sequence_order() {
        let first = Source::from(vec!["a", "b", "c", "d", "b"]);
        let second = Source::from(vec!["c", "b"]);

        let intersect = SetFilter::new(first.clone(), second.clone(), SetMode::Intersect);
        assert_eq!(drain(&intersect).unwrap(), vec!["b", "c"]);

        let diff = SetFilter::new(first, second, SetMode::Diff);
        assert_eq!(drain(&diff).unwrap(), vec!["a", "d"]);
    }

    #[test]
    fn concat_appends_tail() {
        let concat = Concat::new(Source::from(vec![1, 2]), Source::from(vec![3]));
        assert_eq!(drain(&concat).unwrap(), vec![1, 2, 3]);
    }
}
