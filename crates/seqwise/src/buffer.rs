//! Materialization cache shared by the buffering operators.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{QueryError, Result};

enum State<T> {
    Unbuilt,
    Materializing,
    Ready(Rc<[T]>),
}

/// A lazily built, shared buffer.
///
/// The buffer is built on first request and handed out by reference count
/// afterwards. A failed build leaves it unbuilt so the next request retries.
pub(crate) struct Buffer<T> {
    state: RefCell<State<T>>,
}

impl<T> Buffer<T> {
    pub(crate) fn new() -> Self {
        Buffer {
            state: RefCell::new(State::Unbuilt),
        }
    }

    /// Returns the buffer, running `build` if it has not been built yet.
    ///
    /// Requesting the buffer from inside `build` fails with
    /// [`QueryError::Reentrant`].
    pub(crate) fn get_or_build(&self, build: impl FnOnce() -> Result<Vec<T>>) -> Result<Rc<[T]>> {
        match &*self.state.borrow() {
            State::Ready(items) => return Ok(Rc::clone(items)),
            State::Materializing => return Err(QueryError::Reentrant),
            State::Unbuilt => {}
        }

        *self.state.borrow_mut() = State::Materializing;
        let built = build().map(Rc::<[T]>::from);
        *self.state.borrow_mut() = match &built {
            Ok(items) => State::Ready(Rc::clone(items)),
            Err(_) => State::Unbuilt,
        };
        built
    }

    /// Drops the buffer so the next request rebuilds it.
    pub(crate) fn reset(&mut self) {
        *self.state.get_mut() = State::Unbuilt;
    }

    #[cfg(test)]
    fn is_built(&self) -> bool {
        matches!(&*self.state.borrow(), State::Ready(_))
    }
}
