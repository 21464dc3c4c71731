//! Query builder.
//!
//! The [`Query`] struct wraps a [`Sequence`] and provides the fluent
//! operator API. Every operator consumes the query and returns a new one
//! wrapping the extended chain; nothing runs until the chain is iterated or
//! a terminal operator is called.

use crate::chain::{
    Concat, Distinct, DistinctBy, Filter, Select, SelectMany, SetFilter, SetMode, Skip, Take,
};
use crate::compare::{Comparator, Natural};
use crate::error::{QueryError, Result};
use crate::group::GroupEngine;
use crate::order::{key_fn, Dir, OrderEngine};
use crate::sequence::{BoxedSequence, Cursor, Iter, Sequence};
use crate::source::{NotIterable, Source, TryIntoSource};
use crate::value::Value;

/// A lazily evaluated query over a sequence.
///
/// # Example
///
/// ```
/// let query = seqwise::from(vec![5, 12, 3, 8])
///     .filter(|n| *n > 4)
///     .order_by(|n| *n)
///     .select(|n| n * 10);
///
/// assert_eq!(query.to_vec()?, vec![50, 80, 120]);
/// // Queries can be evaluated again; the source is never consumed.
/// assert_eq!(query.count()?, 3);
/// # Ok::<(), seqwise::QueryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query<S> {
    pub(crate) seq: S,
}

/// Creates a query over any finite collection.
///
/// The items are collected once into a shared buffer; the caller's
/// collection is not referenced afterwards.
pub fn from<I: IntoIterator>(items: I) -> Query<Source<I::Item>> {
    Query::new(items.into_iter().collect())
}

impl<S> Query<S> {
    /// Wraps a sequence.
    pub fn new(seq: S) -> Self {
        Query { seq }
    }

    /// Unwraps the underlying sequence.
    pub fn into_inner(self) -> S {
        self.seq
    }
}

impl<T> Query<Source<T>> {
    /// Creates a query over the values of a key/value mapping.
    ///
    /// Keys are dropped; values keep the mapping's iteration order, so
    /// positional operators such as [`element_at`](Query::element_at) count
    /// from the first entry.
    pub fn from_map<K, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
    {
        Query::new(Source::from_values(entries))
    }

    /// Creates a query from anything that may turn out not to be iterable,
    /// such as a dynamic [`Value`](crate::Value).
    ///
    /// Fails with [`QueryError::InvalidArgument`] when `items` is not a
    /// sequence.
    pub fn try_from_source(items: impl TryIntoSource<T>) -> Result<Self> {
        Ok(Query::new(to_source(items, "source")?))
    }
}

impl<T> From<Vec<T>> for Query<Source<T>> {
    fn from(items: Vec<T>) -> Self {
        Query::new(Source::from(items))
    }
}

impl<T> FromIterator<T> for Query<Source<T>> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Query::new(iter.into_iter().collect())
    }
}

fn to_source<T>(items: impl TryIntoSource<T>, what: &str) -> Result<Source<T>> {
    items.try_into_source().map_err(|NotIterable(actual)| {
        QueryError::invalid_argument(format!("{what} must be a sequence, got {actual}"))
    })
}

impl<S: Sequence> Query<S> {
    // ========================================================================
    // Stateless operators
    // ========================================================================

    /// Keeps the elements for which `predicate` returns `true`.
    ///
    /// The predicate may return any value; anything other than a boolean
    /// fails the iteration with [`QueryError::TypeMismatch`].
    pub fn filter<F, P>(self, predicate: F) -> Query<Filter<S, F>>
    where
        F: Fn(&S::Item) -> P,
        P: Into<Value>,
    {
        Query::new(Filter::new(self.seq, predicate))
    }

    /// Projects every element.
    pub fn select<F, U>(self, selector: F) -> Query<Select<S, F>>
    where
        F: Fn(S::Item) -> U,
    {
        Query::new(Select::new(self.seq, selector))
    }

    /// Projects every element to a sequence and flattens the results.
    ///
    /// A projection that is not iterable (for example `Value::Null` or
    /// `None`) fails the iteration with [`QueryError::TypeMismatch`].
    pub fn select_many<F, R, U>(self, selector: F) -> Query<SelectMany<S, F, U>>
    where
        F: Fn(S::Item) -> R,
        R: TryIntoSource<U>,
    {
        Query::new(SelectMany::new(self.seq, selector))
    }

    /// Yields at most the first `count` elements.
    pub fn take(self, count: usize) -> Query<Take<S>> {
        Query::new(Take::new(self.seq, count))
    }

    /// Skips the first `count` elements.
    pub fn skip(self, count: usize) -> Query<Skip<S>> {
        Query::new(Skip::new(self.seq, count))
    }

    /// Appends the elements of `other`.
    ///
    /// Fails immediately with [`QueryError::InvalidArgument`] when `other`
    /// is not a sequence.
    pub fn concat(self, other: impl TryIntoSource<S::Item>) -> Result<Query<Concat<S>>> {
        let other = to_source(other, "concat argument")?;
        Ok(Query::new(Concat::new(self.seq, other)))
    }

    /// Removes repeated elements, keeping first occurrences in order.
    pub fn distinct(self) -> Query<Distinct<S>>
    where
        S::Item: PartialEq,
    {
        Query::new(Distinct::new(self.seq))
    }

    /// Keeps the first element for every distinct key.
    pub fn distinct_by<F, K>(self, key: F) -> Query<DistinctBy<S, F, Natural>>
    where
        F: Fn(&S::Item) -> K,
        K: Into<Value>,
    {
        self.distinct_by_with(key, Natural::default())
    }

    /// Like [`distinct_by`](Query::distinct_by) with an explicit comparator.
    pub fn distinct_by_with<F, K, C>(self, key: F, comparator: C) -> Query<DistinctBy<S, F, C>>
    where
        F: Fn(&S::Item) -> K,
        K: Into<Value>,
        C: Comparator,
    {
        Query::new(DistinctBy::new(self.seq, key, comparator))
    }

    /// Keeps the elements that also occur in `other`.
    ///
    /// Every element is yielded once, in this query's order.
    pub fn intersect(self, other: impl TryIntoSource<S::Item>) -> Result<Query<SetFilter<S>>> {
        let other = to_source(other, "intersect argument")?;
        Ok(Query::new(SetFilter::new(self.seq, other, SetMode::Intersect)))
    }

    /// Keeps the elements that do not occur in `other`.
    ///
    /// Every element is yielded once, in this query's order.
    pub fn diff(self, other: impl TryIntoSource<S::Item>) -> Result<Query<SetFilter<S>>> {
        let other = to_source(other, "diff argument")?;
        Ok(Query::new(SetFilter::new(self.seq, other, SetMode::Diff)))
    }

    // ========================================================================
    // Buffering operators
    // ========================================================================

    /// Sorts by `key`, ascending. The sort is stable.
    ///
    /// Follow with [`then_by`](Query::then_by) or
    /// [`then_by_descending`](Query::then_by_descending) to break ties.
    pub fn order_by<'k, F, K>(self, key: F) -> Query<OrderEngine<'k, S>>
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
    {
        self.order_by_with(key, Natural::default())
    }

    /// Sorts by `key`, descending. The sort is stable.
    pub fn order_by_descending<'k, F, K>(self, key: F) -> Query<OrderEngine<'k, S>>
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
    {
        self.order_by_descending_with(key, Natural::default())
    }

    /// Sorts by `key`, ascending, comparing keys with `comparator`.
    pub fn order_by_with<'k, F, K, C>(self, key: F, comparator: C) -> Query<OrderEngine<'k, S, C>>
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
        C: Comparator,
    {
        Query::new(OrderEngine::new(self.seq, key_fn(key), Dir::Asc, comparator))
    }

    /// Sorts by `key`, descending, comparing keys with `comparator`.
    pub fn order_by_descending_with<'k, F, K, C>(
        self,
        key: F,
        comparator: C,
    ) -> Query<OrderEngine<'k, S, C>>
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
        C: Comparator,
    {
        Query::new(OrderEngine::new(self.seq, key_fn(key), Dir::Desc, comparator))
    }

    /// Partitions the elements by `key`.
    ///
    /// Yields one [`Group`](crate::Group) per distinct key, in first-seen
    /// order.
    pub fn group_by<'k, F, K>(self, key: F) -> Query<GroupEngine<'k, S>>
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
    {
        self.group_by_with(key, Natural::default())
    }

    /// Like [`group_by`](Query::group_by) with an explicit comparator
    /// deciding key equality.
    pub fn group_by_with<'k, F, K, C>(self, key: F, comparator: C) -> Query<GroupEngine<'k, S, C>>
    where
        F: Fn(&S::Item) -> K + 'k,
        K: Into<Value>,
        C: Comparator,
    {
        Query::new(GroupEngine::new(self.seq, key_fn(key), comparator))
    }

    // ========================================================================
    // Consumption
    // ========================================================================

    /// Starts a new pass over the query.
    pub fn iter(&self) -> Iter<'_, S::Item> {
        self.seq.iter()
    }

    /// Returns an unstarted [`Cursor`] over the query.
    pub fn cursor(&self) -> Cursor<'_, S::Item> {
        Cursor::new(&self.seq)
    }

    /// Collects the elements into a vector.
    pub fn to_vec(&self) -> Result<Vec<S::Item>> {
        self.iter().collect()
    }

    /// Calls `f` on every element, then returns the query for further
    /// chaining.
    pub fn each<F>(&self, mut f: F) -> Result<&Self>
    where
        F: FnMut(&S::Item),
    {
        for item in self.iter() {
            f(&item?);
        }
        Ok(self)
    }

    /// Erases the operator type.
    ///
    /// Useful when a chain is built conditionally and the branches must
    /// share a type.
    pub fn boxed<'a>(self) -> Query<BoxedSequence<'a, S::Item>>
    where
        S: 'a,
    {
        let seq: BoxedSequence<'a, S::Item> = Box::new(self.seq);
        Query::new(seq)
    }
}

impl<S: Sequence> Sequence for Query<S> {
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, S::Item> {
        self.seq.iter()
    }
}

impl<'q, S: Sequence> IntoIterator for &'q Query<S> {
    type Item = Result<S::Item>;
    type IntoIter = Iter<'q, S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.seq.iter()
    }
}
