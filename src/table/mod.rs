//! Table Module
//!
//! Loading of one table section into a keyed, ordered table.
//!
//! ## Responsibilities
//! - Read the record count, decode each record, index it by primary key
//! - Report duplicate keys and keep the first-seen record
//! - Index unique keys besides the primary key
//! - Abort on decode errors; a partially decoded table is never published
//! - Cross-table reference checks once every table is loaded
//!
//! ## Table Payload
//! ```text
//! ┌──────────────┬──────────┬──────────┬─────┐
//! │RecordCount(4)│ Record 0 │ Record 1 │ ... │
//! └──────────────┴──────────┴──────────┴─────┘
//! ```
//! Record layout is defined by the record type's `decode`.

mod key;
mod loader;

use std::fmt;

pub use key::{KeyDisplay, KeyValue, RecordKey};
pub use loader::{load_table, Table};

use crate::error::Result;
use crate::registry::Snapshot;
use crate::report::LoadErrors;
use crate::stream::Stream;

/// A row type of a compiled table.
///
/// Generated table accessors implement this; the loader itself only needs
/// the key accessor and the decode function.
pub trait Record: Sized + Send + Sync + 'static {
    /// Primary key, a tuple for multi-column keys. Record identity is the
    /// key alone.
    type Key: RecordKey;

    /// Section name in the blob
    const TABLE: &'static str;

    fn key(&self) -> &Self::Key;

    /// Decode one record, consuming exactly its encoded bytes
    fn decode(stream: &mut Stream<'_>) -> Result<Self>;

    /// Unique keys besides the primary key, as `(name, value)` pairs.
    ///
    /// Each record returns the same names; a repeated value within one
    /// name is reported as `DuplicateKey`.
    fn unique_keys(&self) -> Vec<(&'static str, KeyValue)> {
        Vec::new()
    }

    /// Report references to keys missing from other tables.
    ///
    /// Runs after every table of the pass has loaded.
    fn check_refs(&self, _refs: &mut RefCheck<'_>) {}
}

/// Reference checker handed to `Record::check_refs`
pub struct RefCheck<'a> {
    snapshot: &'a Snapshot,
    errors: &'a mut LoadErrors,
    table: &'static str,
    key: &'a dyn fmt::Display,
}

impl<'a> RefCheck<'a> {
    pub(crate) fn new(
        snapshot: &'a Snapshot,
        errors: &'a mut LoadErrors,
        table: &'static str,
        key: &'a dyn fmt::Display,
    ) -> Self {
        Self {
            snapshot,
            errors,
            table,
            key,
        }
    }

    /// Check that `target` is a key of table `T`.
    ///
    /// Reports `DanglingReference` and returns false when it is not. The
    /// referencing record keeps the unresolved key either way.
    pub fn require<T: Record>(&mut self, field: &str, target: &T::Key) -> bool {
        let found = self
            .snapshot
            .get::<T>()
            .map_or(false, |table| table.get(target).is_some());
        if !found {
            self.errors
                .dangling_reference(self.table, self.key, field, T::TABLE, target.display());
        }
        found
    }

    /// Check that `target` is a value of unique key `unique` in table `T`
    pub fn require_unique<T: Record>(&mut self, field: &str, unique: &str, target: &KeyValue) -> bool {
        let found = self
            .snapshot
            .get::<T>()
            .map_or(false, |table| table.get_unique(unique, target).is_some());
        if !found {
            let target_table = format!("{}.{}", T::TABLE, unique);
            self.errors
                .dangling_reference(self.table, self.key, field, &target_table, target);
        }
        found
    }
}
