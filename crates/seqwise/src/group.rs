//! Partitioning by key.

use std::ops::Deref;

use crate::buffer::Buffer;
use crate::compare::{Comparator, Natural};
use crate::error::Result;
use crate::order::KeyFn;
use crate::query::Query;
use crate::sequence::{Iter, Sequence};
use crate::source::Source;
use crate::value::Value;

/// One partition produced by `group_by`.
///
/// A group carries its key and dereferences to a query over its members, so
/// every query operator is available on it directly.
///
/// # Example
///
/// ```
/// let groups = seqwise::from(vec!["apple", "avocado", "banana"])
///     .group_by(|s| s[..1].to_string())
///     .to_vec()?;
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].key().as_str(), Some("a"));
/// assert_eq!(groups[0].count()?, 2);
/// # Ok::<(), seqwise::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Group<T> {
    key: Value,
    members: Query<Source<T>>,
}

impl<T> Group<T> {
    /// Returns the key shared by every member.
    pub fn key(&self) -> &Value {
        &self.key
    }

    /// Returns the members as a query.
    pub fn members(&self) -> &Query<Source<T>> {
        &self.members
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.seq.len()
    }

    /// Groups are never empty; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.seq.is_empty()
    }
}

impl<T> Deref for Group<T> {
    type Target = Query<Source<T>>;

    fn deref(&self) -> &Self::Target {
        &self.members
    }
}

/// Sequence node that partitions its upstream into [`Group`]s.
///
/// Groups appear in the order their keys were first seen; members keep their
/// upstream order. Two keys belong to the same group when the comparator
/// finds them equal.
pub struct GroupEngine<'k, S: Sequence, C = Natural> {
    upstream: S,
    key: KeyFn<'k, S::Item>,
    comparator: C,
    groups: Buffer<Group<S::Item>>,
}

impl<'k, S: Sequence, C: Comparator> GroupEngine<'k, S, C> {
    pub(crate) fn new(upstream: S, key: KeyFn<'k, S::Item>, comparator: C) -> Self {
        GroupEngine {
            upstream,
            key,
            comparator,
            groups: Buffer::new(),
        }
    }

    fn partition(&self) -> Result<Vec<Group<S::Item>>> {
        let mut partitions: Vec<(Value, Vec<S::Item>)> = Vec::new();
        let mut elements = 0usize;

        for item in self.upstream.iter() {
            let item = item?;
            let key = (self.key)(&item);
            elements += 1;

            let mut slot = None;
            for (i, (known, _)) in partitions.iter().enumerate() {
                if self.comparator.equals(known, &key)? {
                    slot = Some(i);
                    break;
                }
            }
            match slot {
                Some(i) => partitions[i].1.push(item),
                None => partitions.push((key, vec![item])),
            }
        }

        tracing::debug!(
            elements,
            groups = partitions.len(),
            "group buffer materialized"
        );
        Ok(partitions
            .into_iter()
            .map(|(key, members)| Group {
                key,
                members: Query::new(Source::from(members)),
            })
            .collect())
    }
}

impl<'k, S, C> Sequence for GroupEngine<'k, S, C>
where
    S: Sequence,
    S::Item: Clone,
    C: Comparator,
{
    type Item = Group<S::Item>;

    fn iter(&self) -> Iter<'_, Group<S::Item>> {
        match self.groups.get_or_build(|| self.partition()) {
            Ok(groups) => Box::new(Source::from(groups).into_iter().map(Ok)),
            Err(err) => Box::new(std::iter::once(Err(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::order::key_fn;
    use std::cell::Cell;

    fn groups<T: Clone>(engine: &GroupEngine<'_, Source<T>>) -> Vec<Group<T>> {
        engine.iter().collect::<Result<_>>().unwrap()
    }

    fn members<T: Clone>(group: &Group<T>) -> Vec<T> {
        group.members.seq.as_slice().to_vec()
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let source = Source::from(vec![
            Value::map([("v", "a")]),
            Value::map([("v", "b")]),
            Value::map([("v", "a")]),
        ]);
        let engine = GroupEngine::new(
            source,
            key_fn(|v: &Value| v.get("v").cloned()),
            Natural::default(),
        );
        let groups = groups(&engine);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key(), &Value::from("a"));
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].key(), &Value::from("b"));
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn keys_match_by_comparator_equality() {
        let source = Source::from(vec!["A", "x", "a"]);
        let engine = GroupEngine::new(
            source,
            key_fn(|s: &&'static str| *s),
            Natural::default(),
        );
        let groups = groups(&engine);

        assert_eq!(groups.len(), 2);
        assert_eq!(members(&groups[0]), vec!["A", "a"]);
        assert_eq!(members(&groups[1]), vec!["x"]);
    }

    #[test]
    fn number_and_plain_text_keys_fail() {
        let source = Source::from(vec![Value::from(2), Value::from("A")]);
        let engine = GroupEngine::new(source, key_fn(|v: &Value| v.clone()), Natural::default());
        let result: Result<Vec<_>> = engine.iter().collect();
        assert_eq!(result.unwrap_err(), QueryError::type_mismatch("number", "text"));
    }

    #[test]
    fn grouping_is_lazy_and_buffered() {
        let calls = Cell::new(0);
        let engine = GroupEngine::new(
            Source::from(vec![1, 2, 1]),
            key_fn(|n: &i32| {
                calls.set(calls.get() + 1);
                *n
            }),
            Natural::default(),
        );
        assert_eq!(calls.get(), 0);

        assert_eq!(groups(&engine).len(), 2);
        assert_eq!(groups(&engine).len(), 2);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn numeric_keys_unify_across_types() {
        let source = Source::from(vec![Value::from(2), Value::from("2"), Value::from(2.0)]);
        let engine = GroupEngine::new(source, key_fn(|v: &Value| v.clone()), Natural::default());
        assert_eq!(groups(&engine).len(), 1);
    }

    #[test]
    fn large_integers_stay_apart_from_nearby_floats() {
        let source = Source::from(vec![
            Value::from((1i64 << 53) + 1),
            Value::from((1u64 << 53) as f64),
        ]);
        let engine = GroupEngine::new(source, key_fn(|v: &Value| v.clone()), Natural::default());
        assert_eq!(groups(&engine).len(), 2);
    }

    #[test]
    fn empty_upstream_has_no_groups() {
        let engine = GroupEngine::new(
            Source::<i32>::default(),
            key_fn(|n: &i32| *n),
            Natural::default(),
        );
        assert!(groups(&engine).is_empty());
    }

    #[test]
    fn incomparable_keys_fail() {
        let source = Source::from(vec![Value::from(1), Value::from(true)]);
        let engine = GroupEngine::new(source, key_fn(|v: &Value| v.clone()), Natural::default());
        let result: Result<Vec<_>> = engine.iter().collect();
        assert!(matches!(result, Err(QueryError::TypeMismatch { .. })));
    }
}
