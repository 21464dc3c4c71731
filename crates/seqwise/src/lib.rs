//! Seqwise - Lazy, composable queries over in-memory sequences.
//!
//! Seqwise provides a fluent API for filtering, projecting, ordering,
//! grouping and aggregating finite collections. It supports:
//!
//! - Lazy operator chains: nothing runs until the query is iterated
//! - Stable multi-key ordering with ascending/descending keys
//! - Grouping by key with first-seen group order
//! - Set operations, aggregates, quantifiers and element access
//! - Dynamic data through [`Value`], `serde_json` and named [`Record`] fields
//!
//! # Quick Start
//!
//! ```rust
//! use seqwise::Value;
//!
//! #[derive(Clone)]
//! struct Task {
//!     name: &'static str,
//!     priority: i32,
//!     archived: bool,
//! }
//!
//! let tasks = vec![
//!     Task { name: "Write docs", priority: 3, archived: false },
//!     Task { name: "Fix bug", priority: 5, archived: false },
//!     Task { name: "Old task", priority: 1, archived: true },
//! ];
//!
//! let open = seqwise::from(tasks)
//!     .filter(|t| !t.archived)
//!     .order_by_descending(|t| t.priority)
//!     .then_by(|t| t.name);
//!
//! let names: Vec<&str> = open.select(|t| t.name).to_vec()?;
//! assert_eq!(names, vec!["Fix bug", "Write docs"]);
//! # Ok::<(), seqwise::QueryError>(())
//! ```
//!
//! # Evaluation
//!
//! A [`Query`] is a description of work. Each operator wraps the previous
//! sequence in a new node and returns immediately; the chain runs when it is
//! iterated (`for item in &query`, [`Query::iter`], [`Query::cursor`]) or
//! when a terminal operator such as [`Query::count`] is called. Every
//! evaluation starts from the first element again, and the source
//! collection is never modified.
//!
//! Stateless operators (`filter`, `select`, `select_many`, `take`, `skip`,
//! `concat`, `distinct`, `intersect`, `diff`) pull from upstream one element
//! at a time. `order_by` and `group_by` buffer the whole upstream on first
//! iteration and replay the buffer afterwards.
//!
//! # Runtime Checks
//!
//! Elements keep their own type, but keys, predicate results and aggregated
//! numbers pass through [`Value`] and are checked at runtime:
//!
//! | Input | Requirement | Error |
//! |-------|-------------|-------|
//! | predicate result | boolean | `TypeMismatch` |
//! | `select_many` result | list, map or collection | `TypeMismatch` |
//! | `concat` / `intersect` / `diff` argument | sequence | `InvalidArgument` |
//! | ordering / grouping key | comparable with the other keys | `TypeMismatch` |
//! | `sum` / `average` value | number or numeric text | `TypeMismatch` |
//! | `min` / `max` value | number, text or timestamp | `TypeMismatch` |
//!
//! Errors surface from the call that drives evaluation; see [`QueryError`].
//!
//! # Comparison
//!
//! Ordering, grouping, `distinct_by` and `min`/`max` compare keys with a
//! [`Comparator`]. The default, [`Natural`], orders numbers arithmetically
//! (numeric text included), text case-insensitively and timestamps
//! chronologically. Pass another comparator through the `_with` variants.

mod aggregate;
mod buffer;
mod chain;
mod compare;
mod error;
mod group;
mod order;
mod query;
mod record;
mod sequence;
mod source;
mod value;

// Re-export public API
pub use chain::{
    Concat, Distinct, DistinctBy, Filter, Select, SelectMany, SetFilter, SetMode, Skip, Take,
};
pub use compare::{ensure_comparable, Case, Comparator, Natural};
pub use error::{QueryError, Result};
pub use group::{Group, GroupEngine};
pub use order::OrderEngine;
pub use query::{from, Query};
pub use record::{field, Record, ToValue};
pub use sequence::{BoxedSequence, Cursor, Iter, Sequence};
pub use source::{IntoIter, NotIterable, Source, TryIntoSource};
pub use value::{Category, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use seqwise_macros::Record;
