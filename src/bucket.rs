use alloc::{
    boxed::Box,
    collections::{btree_map, BTreeMap},
};
use core::ops::Index;

/// Ordered key-value store keyed by identifiers.
///
/// Iteration is in key order, so diagnostics over a bucket are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<V> {
    entries: BTreeMap<Box<str>, V>,
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Bucket<V> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Returns the value stored under `key` before, if any
    #[inline]
    pub fn set(&mut self, key: impl Into<Box<str>>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    #[inline]
    pub fn entry(&mut self, key: impl Into<Box<str>>) -> btree_map::Entry<'_, Box<str>, V> {
        self.entries.entry(key.into())
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (&**key, value))
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| &**key)
    }
}

/// # Panics
/// Panics if the key isn't in the bucket
impl<V> Index<&str> for Bucket<V> {
    type Output = V;

    #[inline]
    fn index(&self, key: &str) -> &V {
        &self.entries[key]
    }
}

impl<K: Into<Box<str>>, V> FromIterator<(K, V)> for Bucket<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(key, value)| (key.into(), value)).collect(),
        }
    }
}

impl<K: Into<Box<str>>, V> Extend<(K, V)> for Bucket<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(|(key, value)| (key.into(), value)));
    }
}

impl<V> IntoIterator for Bucket<V> {
    type Item = (Box<str>, V);
    type IntoIter = btree_map::IntoIter<Box<str>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Bucket<V> {
    type Item = (&'a Box<str>, &'a V);
    type IntoIter = btree_map::Iter<'a, Box<str>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
