//! Utility functions and traits built on the [`HashTable`] contract

use crate::{ChainedHashMap, HashTable, ProbingHashMap, SumHasher};

/// Extension trait for map implementations that provides additional utility methods
pub trait HashMapExtensions<V> {
    /// Returns the keys of the hash map as a Vec
    fn keys<'a>(&'a self) -> Vec<&'a str>
    where
        V: 'a;

    /// Returns the values of the hash map as a Vec
    fn values<'a>(&'a self) -> Vec<&'a V>
    where
        V: 'a;
}

impl<V, T> HashMapExtensions<V> for T
where
    T: HashTable<V> + ?Sized,
{
    fn keys<'a>(&'a self) -> Vec<&'a str>
    where
        V: 'a,
    {
        self.get_keys_and_values().into_iter().map(|(key, _)| key).collect()
    }

    fn values<'a>(&'a self) -> Vec<&'a V>
    where
        V: 'a,
    {
        self.get_keys_and_values().into_iter().map(|(_, value)| value).collect()
    }
}

/// Creates a `ProbingHashMap` from an iterator of key-value pairs
pub fn from_iter<K, V, I>(iter: I) -> ProbingHashMap<V>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = ProbingHashMap::new();
    map.extend(iter);
    map
}

/// Finds the most frequent strings in `items`.
///
/// Returns every value sharing the highest count (in no particular order) together
/// with that count. An empty input gives `(vec![], 0)`.
pub fn find_mode<I>(items: I) -> (Vec<String>, usize)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: ChainedHashMap<usize, SumHasher> = ChainedHashMap::new();
    for item in items {
        let item = item.as_ref();
        if let Some(count) = counts.get_mut(item) {
            *count = count.saturating_add(1);
        } else {
            counts.put(item, 1);
        }
    }

    let mut mode = Vec::new();
    let mut frequency = 0;
    for (key, &count) in &counts {
        if count > frequency {
            frequency = count;
            mode.clear();
            mode.push(key.to_string());
        } else if count == frequency {
            mode.push(key.to_string());
        }
    }
    (mode, frequency)
}
