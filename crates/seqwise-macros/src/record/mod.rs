//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module generates `Record` and `ToValue` implementations and field
//! name constants from struct definitions.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
