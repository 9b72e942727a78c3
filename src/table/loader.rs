//! Table loader
//!
//! Schema-agnostic decode loop plus the per-table query surface.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use super::{KeyValue, Record, RecordKey};
use crate::error::Result;
use crate::keyed::{KeyedList, OrderedValues};
use crate::report::LoadErrors;
use crate::stream::Stream;

/// Decode one table payload into a KeyedList
///
/// Reads the int32 record count, then calls `decode` that many times.
/// A duplicate key is reported to `errors` and the later record dropped.
/// Decode errors are returned as-is; the caller must discard the table.
pub fn load_table<K, V, FK, FD>(
    table: &str,
    stream: &mut Stream<'_>,
    errors: &mut LoadErrors,
    mut key_of: FK,
    mut decode: FD,
) -> Result<KeyedList<K, V>>
where
    K: RecordKey,
    FK: FnMut(&V) -> K,
    FD: FnMut(&mut Stream<'_>) -> Result<V>,
{
    let start = stream.position();
    let count = stream.read_count()?;
    let mut rows = KeyedList::with_capacity(count.min(stream.remaining()));

    for _ in 0..count {
        let record = decode(stream)?;
        let key = key_of(&record);
        if rows.contains_key(&key) {
            errors.duplicate_key(table, key.display());
            continue;
        }
        rows.insert(key, record);
    }

    debug!(
        table,
        records = count,
        rows = rows.len(),
        bytes = stream.position() - start,
        "Table decoded"
    );
    Ok(rows)
}

/// Unique key name -> (unique value -> primary key)
type UniqueIndex<K> = IndexMap<&'static str, KeyedList<KeyValue, K>>;

/// Index every record's unique keys in row order.
///
/// A repeated value is reported and stays mapped to the first record.
fn index_unique_keys<R: Record>(
    rows: &KeyedList<R::Key, R>,
    errors: &mut LoadErrors,
) -> UniqueIndex<R::Key> {
    let mut unique: UniqueIndex<R::Key> = IndexMap::new();
    for record in rows.ordered_values() {
        for (name, value) in record.unique_keys() {
            let index = unique.entry(name).or_default();
            match index.get(&value) {
                Some(first) => errors.duplicate_unique_key(
                    R::TABLE,
                    record.key().display(),
                    name,
                    &value,
                    first.display(),
                ),
                None => {
                    index.insert(value, record.key().clone());
                }
            }
        }
    }
    unique
}

/// Immutable, loaded table of `R` records
pub struct Table<R: Record> {
    rows: KeyedList<R::Key, R>,
    unique: UniqueIndex<R::Key>,
}

impl<R: Record> Table<R> {
    /// Decode this table's payload from `stream`
    pub fn load(stream: &mut Stream<'_>, errors: &mut LoadErrors) -> Result<Self> {
        let rows = load_table(R::TABLE, stream, errors, |r: &R| r.key().clone(), R::decode)?;
        let unique = index_unique_keys(&rows, errors);
        Ok(Self { rows, unique })
    }

    /// Table with no rows
    pub fn empty() -> Self {
        Self {
            rows: KeyedList::new(),
            unique: IndexMap::new(),
        }
    }

    /// Record with primary key `key`
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.rows.get(key)
    }

    /// Record whose unique key `name` equals `value`
    pub fn get_unique(&self, name: &str, value: &KeyValue) -> Option<&R> {
        let key = self.unique.get(name)?.get(value)?;
        self.rows.get(key)
    }

    /// Names of the indexed unique keys, in first-seen order
    pub fn unique_key_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.unique.keys().copied()
    }

    /// Every record, in source row order
    pub fn all(&self) -> OrderedValues<'_, R::Key, R> {
        self.rows.ordered_values()
    }

    /// Records matching `predicate`, in source row order
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&R>
    where
        P: FnMut(&R) -> bool,
    {
        self.rows.ordered_values().filter(|r| predicate(*r)).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.rows.keys()
    }

    pub fn rows(&self) -> &KeyedList<R::Key, R> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> fmt::Debug for Table<R>
where
    R: Record + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &R::TABLE)
            .field("rows", &self.rows)
            .field("unique", &self.unique.keys().collect::<Vec<_>>())
            .finish()
    }
}
