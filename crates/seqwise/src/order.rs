//! Multi-key, stable ordering.
//!
//! [`OrderEngine`] is the node behind `order_by` and friends. It buffers the
//! whole upstream on first iteration, extracts every ranking key once per
//! element and merges the elements into order. Further iterations replay the
//! sorted buffer.

use std::cmp::Ordering;

use crate::buffer::Buffer;
use crate::compare::{Comparator, Natural};
use crate::error::Result;
use crate::query::Query;
use crate::sequence::{Iter, Sequence};
use crate::source::Source;
use crate::value::Value;

/// Direction of one ranking key.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Dir {
    Asc,
    Desc,
}

impl Dir {
    /// Reverses `ordering` for descending keys.
    pub(crate) fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

/// Boxed key function, as stored by the buffering operators.
pub(crate) type KeyFn<'k, T> = Box<dyn Fn(&T) -> Value + 'k>;

pub(crate) fn key_fn<'k, T, F, K>(key: F) -> KeyFn<'k, T>
where
    F: Fn(&T) -> K + 'k,
    K: Into<Value>,
{
    Box::new(move |item: &T| key(item).into())
}

struct RankingKey<'k, T> {
    extract: KeyFn<'k, T>,
    dir: Dir,
}

/// Sequence node that yields its upstream in key order.
///
/// Keys are compared in the order they were added; the first non-equal key
/// decides. Elements whose keys are all equal keep their upstream order.
pub struct OrderEngine<'k, S: Sequence, C = Natural> {
    upstream: S,
    keys: Vec<RankingKey<'k, S::Item>>,
    comparator: C,
    sorted: Buffer<S::Item>,
}

impl<'k, S: Sequence, C: Comparator> OrderEngine<'k, S, C> {
    pub(crate) fn new(upstream: S, key: KeyFn<'k, S::Item>, dir: Dir, comparator: C) -> Self {
        OrderEngine {
            upstream,
            keys: vec![RankingKey { extract: key, dir }],
            comparator,
            sorted: Buffer::new(),
        }
    }

    fn push_key(mut self, key: KeyFn<'k, S::Item>, dir: Dir) -> Self {
        self.keys.push(RankingKey { extract: key, dir });
        self.sorted.reset();
        self
    }

    fn sort(&self) -> Result<Vec<S::Item>> {
        let mut rows = Vec::new();
        for item in self.upstream.iter() {
            let item = item?;
            let keys: Vec<Value> = self.keys.iter().map(|k| (k.extract)(&item)).collect();
            rows.push((keys, item));
        }

        let sorted = merge_sort(rows, &mut |(a, _), (b, _)| self.compare_rows(a, b))?;
        tracing::debug!(
            elements = sorted.len(),
            keys = self.keys.len(),
            "order buffer materialized"
        );
        Ok(sorted.into_iter().map(|(_, item)| item).collect())
    }

    fn compare_rows(&self, a: &[Value], b: &[Value]) -> Result<Ordering> {
        for (key, (a, b)) in self.keys.iter().zip(a.iter().zip(b)) {
            let ordering = self.comparator.compare(a, b)?;
            if ordering != Ordering::Equal {
                return Ok(key.dir.apply(ordering));
            }
        }
        Ok(Ordering::Equal)
    }
}

impl<'k, S, C> Sequence for OrderEngine<'k, S, C>
where
    S: Sequence,
    S::Item: Clone,
    C: Comparator,
{
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        match self.sorted.get_or_build(|| self.sort()) {
            Ok(items) => Box::new(Source::from(items).into_iter().map(Ok)),
            Err(err) => Box::new(std::iter::once(Err(err))),
        }
    }
}

/// Stable merge sort with a fallible comparison. The first comparison error
/// aborts the sort.
fn merge_sort<T>(
    mut items: Vec<T>,
    compare: &mut impl FnMut(&T, &T) -> Result<Ordering>,
) -> Result<Vec<T>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties go left, which keeps the sort stable
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r)? != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        merged.extend(if take_left { left.next() } else { right.next() });
    }
    Ok(merged)
}

impl<'k, S: Sequence, C: Comparator> Query<OrderEngine<'k, S, C>> {
    /// Adds an ascending tie-breaking key.
    ///
    /// Appending a key discards any buffer built so far; the next iteration
    /// sorts again with all keys.
    pub fn then_by<F, K>(self, key: F) -> Self
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
    {
        Query::new(self.seq.push_key(key_fn(key), Dir::Asc))
    }

    /// Adds a descending tie-breaking key.
    pub fn then_by_descending<F, K>(self, key: F) -> Self
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
    {
        Query::new(self.seq.push_key(key_fn(key), Dir::Desc))
    }
}
