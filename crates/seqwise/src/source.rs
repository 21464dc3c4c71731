//! Sources: the boundary between caller-owned data and a query chain.

use std::rc::Rc;

use crate::sequence::{Iter, Sequence};
use crate::value::{Category, Value};

/// A finite, shared buffer of elements that can be iterated any number of
/// times.
///
/// Cloning a source is cheap; clones share the same elements. Iteration
/// hands out clones of the elements and never mutates them.
#[derive(Debug)]
pub struct Source<T> {
    items: Rc<[T]>,
}

impl<T> Source<T> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the source has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Builds a source from the values of a key/value mapping, in the
    /// mapping's iteration order. Keys are discarded.
    pub fn from_values<K, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
    {
        entries.into_iter().map(|(_, v)| v).collect()
    }
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Source {
            items: Rc::clone(&self.items),
        }
    }
}

impl<T> Default for Source<T> {
    fn default() -> Self {
        Source {
            items: Rc::from(Vec::new()),
        }
    }
}

impl<T> From<Vec<T>> for Source<T> {
    fn from(items: Vec<T>) -> Self {
        Source {
            items: Rc::from(items),
        }
    }
}

impl<T> From<Rc<[T]>> for Source<T> {
    fn from(items: Rc<[T]>) -> Self {
        Source { items }
    }
}

impl<T> FromIterator<T> for Source<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Source {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Clone> Sequence for Source<T> {
    type Item = T;

    fn iter(&self) -> Iter<'_, T> {
        Box::new(self.items.iter().cloned().map(Ok))
    }
}

impl<T: Clone> IntoIterator for Source<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            items: self.items,
            pos: 0,
        }
    }
}

/// Owning iterator over a [`Source`].
#[derive(Debug)]
pub struct IntoIter<T> {
    items: Rc<[T]>,
    pos: usize,
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.items.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

/// The category of a value that was expected to be iterable but is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotIterable(pub &'static str);

/// Conversion into a [`Source`] that can fail at runtime.
///
/// Statically typed collections always convert. Dynamic values convert only
/// when they hold a list or a map (whose values are taken in order); any
/// other category reports [`NotIterable`]. Operators turn that report into
/// `InvalidArgument` (for sequence arguments such as `concat`) or
/// `TypeMismatch` (for values produced by `select_many`).
pub trait TryIntoSource<T> {
    /// Attempts the conversion.
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable>;
}

impl<T> TryIntoSource<T> for Source<T> {
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable> {
        Ok(self)
    }
}

impl<T> TryIntoSource<T> for Vec<T> {
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable> {
        Ok(Source::from(self))
    }
}

impl<T, const N: usize> TryIntoSource<T> for [T; N] {
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable> {
        Ok(self.into_iter().collect())
    }
}

impl<T: Clone> TryIntoSource<T> for &[T] {
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable> {
        Ok(self.iter().cloned().collect())
    }
}

impl<T: Clone> TryIntoSource<T> for &Vec<T> {
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable> {
        self.as_slice().try_into_source()
    }
}

impl<T, S: TryIntoSource<T>> TryIntoSource<T> for Option<S> {
    fn try_into_source(self) -> std::result::Result<Source<T>, NotIterable> {
        match self {
            Some(inner) => inner.try_into_source(),
            None => Err(NotIterable(Category::Null.as_str())),
        }
    }
}

impl TryIntoSource<Value> for Value {
    fn try_into_source(self) -> std::result::Result<Source<Value>, NotIterable> {
        match self {
            Value::List(items) => Ok(Source::from(items)),
            Value::Map(entries) => Ok(Source::from_values(entries)),
            other => Err(NotIterable(other.category().as_str())),
        }
    }
}

impl TryIntoSource<Value> for serde_json::Value {
    fn try_into_source(self) -> std::result::Result<Source<Value>, NotIterable> {
        Value::from(self).try_into_source()
    }
}
