//! KeyedList implementation
//!
//! IndexMap-backed append-only map.

use std::fmt;
use std::hash::Hash;

use indexmap::map::{Iter, Keys, Values};
use indexmap::IndexMap;

/// Append-only map with O(1) lookup and insertion-order iteration
#[derive(Debug, Clone)]
pub struct KeyedList<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> KeyedList<K, V>
where
    K: Eq + Hash,
{
    /// Create a new empty KeyedList
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create an empty KeyedList with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert if the key is absent.
    ///
    /// Returns `false` when the key already exists; the stored value is
    /// left untouched and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.entries.entry(key) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Look up a value, falling back to `default` when absent
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.entries.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Values in insertion order.
    ///
    /// Every call starts a fresh pass; iterating never mutates the list.
    pub fn ordered_values(&self) -> OrderedValues<'_, K, V> {
        OrderedValues {
            inner: self.entries.values(),
        }
    }

    /// Values matching `predicate`, in insertion order
    pub fn filter<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a V> + 'a
    where
        P: FnMut(&V) -> bool + 'a,
    {
        self.ordered_values().filter(move |v| predicate(*v))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.entries.keys()
    }

    /// `(key, value)` pairs in insertion order
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for KeyedList<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for KeyedList<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    /// Equal when both hold the same pairs in the same order
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V> FromIterator<(K, V)> for KeyedList<K, V>
where
    K: Eq + Hash,
{
    /// Collects with insert-if-absent semantics
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = KeyedList::new();
        for (key, value) in iter {
            list.insert(key, value);
        }
        list
    }
}

impl<'a, K, V> IntoIterator for &'a KeyedList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> fmt::Display for KeyedList<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        f.write_str("}")
    }
}

/// Iterator over KeyedList values in insertion order
pub struct OrderedValues<'a, K, V> {
    inner: Values<'a, K, V>,
}

impl<'a, K, V> Iterator for OrderedValues<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for OrderedValues<'_, K, V> {}

impl<K, V> DoubleEndedIterator for OrderedValues<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}
