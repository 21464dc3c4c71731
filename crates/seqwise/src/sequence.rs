//! The lazy iteration contract shared by every node of a query chain.

use crate::error::Result;

/// Fallible iterator handed out by [`Sequence::iter`].
pub type Iter<'s, T> = Box<dyn Iterator<Item = Result<T>> + 's>;

/// A re-iterable, lazily evaluated sequence.
///
/// Every call to [`iter`](Sequence::iter) starts a fresh pass from the first
/// element. Nodes do no work until then: a chain of sequences is only a
/// description of the work until someone iterates it.
pub trait Sequence {
    /// The element type.
    type Item;

    /// Starts a new pass over the sequence.
    fn iter(&self) -> Iter<'_, Self::Item>;
}

impl<S: Sequence + ?Sized> Sequence for Box<S> {
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, Self::Item> {
        (**self).iter()
    }
}

impl<S: Sequence + ?Sized> Sequence for &S {
    type Item = S::Item;

    fn iter(&self) -> Iter<'_, Self::Item> {
        (**self).iter()
    }
}

/// A type-erased sequence, see [`Query::boxed`](crate::Query::boxed).
pub type BoxedSequence<'a, T> = Box<dyn Sequence<Item = T> + 'a>;

/// Explicit cursor over a [`Sequence`].
///
/// Offers the classic `start` / `advance` / `current` / `has_current`
/// protocol on top of [`Sequence::iter`]. A cursor that has not been started
/// sits before the first element and `advance` is a no-op; once the end is
/// reached `advance` stays a no-op until the next `start`.
///
/// # Example
///
/// ```
/// let query = seqwise::from(vec![1, 2, 3]);
/// let mut cursor = query.cursor();
///
/// let mut seen = Vec::new();
/// cursor.start()?;
/// while let Some(item) = cursor.current() {
///     seen.push(*item);
///     cursor.advance()?;
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// # Ok::<(), seqwise::QueryError>(())
/// ```
pub struct Cursor<'s, T> {
    sequence: &'s dyn Sequence<Item = T>,
    iter: Option<Iter<'s, T>>,
    current: Option<T>,
}

impl<'s, T> Cursor<'s, T> {
    /// Creates an unstarted cursor over `sequence`.
    pub fn new<S: Sequence<Item = T>>(sequence: &'s S) -> Self {
        Cursor {
            sequence,
            iter: None,
            current: None,
        }
    }

    /// Rewinds to the first element.
    ///
    /// Restarting re-runs the sequence from scratch; buffering operators
    /// replay their buffer instead of reading upstream again.
    pub fn start(&mut self) -> Result<()> {
        tracing::trace!("cursor started");
        self.iter = Some(self.sequence.iter());
        self.current = None;
        self.advance()
    }

    /// Moves to the next element.
    ///
    /// On error the cursor is left exhausted.
    pub fn advance(&mut self) -> Result<()> {
        let Some(iter) = self.iter.as_mut() else {
            return Ok(());
        };
        match iter.next() {
            Some(Ok(item)) => {
                self.current = Some(item);
                Ok(())
            }
            Some(Err(err)) => {
                self.finish();
                Err(err)
            }
            None => {
                self.finish();
                Ok(())
            }
        }
    }

    /// Returns the element under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Returns `true` while the cursor is positioned on an element.
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    fn finish(&mut self) {
        self.iter = None;
        self.current = None;
    }
}
