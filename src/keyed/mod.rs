//! Keyed Module
//!
//! Keyed container with insertion-ordered iteration.
//!
//! ## Responsibilities
//! - O(1) lookup by primary key
//! - Stable iteration in insertion order (mirrors the source row order)
//! - Insert-if-absent semantics, the first value for a key wins
//!
//! ## Data Structure Choice
//! `IndexMap` keeps the key→value mapping and the insertion order in one
//! structure, so the "every key appears exactly once in the order" invariant
//! holds without bookkeeping. Entries are never removed, which keeps the
//! order stable.

mod list;

pub use list::{KeyedList, OrderedValues};
