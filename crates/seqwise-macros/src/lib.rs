//! Proc macros for seqwise.
//!
//! # Available Macros
//!
//! - [`Record`] - Generate named-field access for key selectors
//!
//! # Examples
//!
//! For working examples, see `seqwise/tests/record_derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` and `ToValue` traits for structs with named fields.
///
/// Every field that is not skipped becomes readable by name through
/// `Record::field_value`, and is included in the `Value::Map` returned by
/// `ToValue::to_value`. Field values are cloned and converted with
/// `Value::from`, so each field type must implement `Clone` and
/// `Into<Value>`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from the record |
/// | `rename = "..."` | Use a custom name for the field |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Task::NAME`, `Task::PRIORITY`)
/// 2. Implementation of `Record::field_value()`
/// 3. Implementation of `ToValue::to_value()`
///
/// # Example
///
/// ```ignore
/// use seqwise::{field, Record};
///
/// #[derive(Record, Clone)]
/// struct Task {
///     name: String,
///     priority: u8,
///
///     #[record(rename = "is_done")]
///     done: bool,
///
///     #[record(skip)]
///     internal_id: Vec<u8>,
/// }
///
/// let tasks = vec![
///     Task { name: "Write docs".into(), priority: 3, done: false, internal_id: vec![] },
///     Task { name: "Fix bug".into(), priority: 5, done: true, internal_id: vec![] },
/// ];
///
/// let top = seqwise::from(tasks)
///     .order_by_descending(field(Task::PRIORITY))
///     .first()?;
/// assert_eq!(top.name, "Fix bug");
/// assert_eq!(Task::IS_DONE, "is_done");
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
