//! Published table snapshots
//!
//! A snapshot is every table of one successful load pass. It is immutable
//! once built and shared by `Arc`, so readers need no lock.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::table::RecordKey;
use crate::report::LoadErrors;
use crate::stream::Stream;
use crate::table::{RefCheck, Record, Table};

/// A loaded `Table<R>` with its record type erased
pub(crate) type AnyTable = Arc<dyn Any + Send + Sync>;

/// Type-erased entry points for one registered table
#[derive(Clone, Copy)]
pub(crate) struct TableDef {
    pub name: &'static str,
    pub load: fn(&mut Stream<'_>, &mut LoadErrors) -> Result<AnyTable>,
    pub empty: fn() -> AnyTable,
    pub check_refs: fn(&(dyn Any + Send + Sync), &Snapshot, &mut LoadErrors),
    pub rows: fn(&(dyn Any + Send + Sync)) -> usize,
}

impl TableDef {
    pub fn of<R: Record>() -> Self {
        Self {
            name: R::TABLE,
            load: load_erased::<R>,
            empty: empty_erased::<R>,
            check_refs: check_refs_erased::<R>,
            rows: rows_erased::<R>,
        }
    }
}

impl fmt::Debug for TableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDef").field("name", &self.name).finish()
    }
}

fn load_erased<R: Record>(stream: &mut Stream<'_>, errors: &mut LoadErrors) -> Result<AnyTable> {
    Ok(Arc::new(Table::<R>::load(stream, errors)?))
}

fn empty_erased<R: Record>() -> AnyTable {
    Arc::new(Table::<R>::empty())
}

fn check_refs_erased<R: Record>(
    table: &(dyn Any + Send + Sync),
    snapshot: &Snapshot,
    errors: &mut LoadErrors,
) {
    let Some(table) = table.downcast_ref::<Table<R>>() else {
        return;
    };
    for record in table.all() {
        let key = record.key().display();
        let mut refs = RefCheck::new(snapshot, errors, R::TABLE, &key);
        record.check_refs(&mut refs);
    }
}

fn rows_erased<R: Record>(table: &(dyn Any + Send + Sync)) -> usize {
    table
        .downcast_ref::<Table<R>>()
        .map_or(0, |table| table.len())
}

/// Immutable set of loaded tables from one load pass
#[derive(Default)]
pub struct Snapshot {
    /// Tables in registration order
    tables: IndexMap<&'static str, AnyTable>,
    /// Count of successful passes that produced this snapshot; 0 = never loaded
    generation: u64,
}

impl Snapshot {
    pub(crate) fn new(tables: IndexMap<&'static str, AnyTable>, generation: u64) -> Self {
        Self { tables, generation }
    }

    /// Borrow table `R` from this snapshot
    pub fn get<R: Record>(&self) -> Option<&Table<R>> {
        self.tables
            .get(R::TABLE)
            .and_then(|table| table.downcast_ref::<Table<R>>())
    }

    /// Shared handle to table `R`, usable after the snapshot is replaced
    pub fn table<R: Record>(&self) -> Option<Arc<Table<R>>> {
        let table = self.tables.get(R::TABLE)?.clone();
        table.downcast::<Table<R>>().ok()
    }

    pub(crate) fn raw(&self, name: &str) -> Option<&AnyTable> {
        self.tables.get(name)
    }

    /// Table names in registration order
    pub fn table_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tables.keys().copied()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("tables", &self.tables.keys().collect::<Vec<_>>())
            .finish()
    }
}
