use std::{fmt, iter::FusedIterator, mem, slice};

use crate::{
    chain::{Chain, ChainIter},
    error::ResizeError,
    hashers::{KeyHasher, SumHasher, bucket_index},
    prime::{fitting_capacity, grow_capacity, next_prime},
};

/// Bucket count used by `new` and `default`
const DEFAULT_CAPACITY: usize = 11;

/// Whether `live` entries keep a table of `capacity` buckets below a load factor of one
fn within_load(live: usize, capacity: usize) -> bool {
    live < capacity
}

/// Allocates `capacity` empty collision lists
fn empty_chains<V>(capacity: usize) -> Vec<Chain<V>> {
    (0..capacity).map(|_| Chain::default()).collect()
}

/// A string-keyed hash map resolving collisions by separate chaining.
///
/// Every bucket holds a singly-linked list of the entries hashing to it. The bucket
/// count is always prime and the table grows to the next prime above twice its
/// capacity before an insertion would bring the load factor to one.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<V, H = SumHasher> {
    /// One collision list per bucket
    buckets: Vec<Chain<V>>,
    /// Number of stored entries
    size: usize,
    /// Hash function used to pick a key's bucket
    hasher: H,
}

impl<V> ChainedHashMap<V> {
    /// Creates an empty map with 11 buckets and the [`SumHasher`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with at least `capacity` buckets, rounded up to a prime
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, SumHasher)
    }
}

impl<V, H: Default> Default for ChainedHashMap<V, H> {
    fn default() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, H::default())
    }
}

impl<V, H> ChainedHashMap<V, H> {
    /// Creates an empty map with at least `capacity` buckets using `hasher`
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self { buckets: empty_chains(next_prime(capacity)), size: 0, hasher }
    }

    /// Number of stored entries
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current load factor
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Number of buckets whose collision list is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.len() == 0).count()
    }

    /// Drops every entry, keeping the current capacity
    pub fn clear(&mut self) {
        log::trace!("clearing chained table of {} buckets", self.buckets.len());
        self.buckets = empty_chains(self.buckets.len());
        self.size = 0;
    }

    /// Iterates over the pairs bucket by bucket, in list order within a bucket
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), current: None }
    }

    /// Collects every key-value pair, bucket by bucket
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }
}

impl<V, H: KeyHasher> ChainedHashMap<V, H> {
    /// Index of the bucket `key` belongs to
    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(self.hasher.hash_key(key), self.buckets.len())
    }

    /// Adds a pair whose key is not in the table. Doesn't check the load factor.
    fn insert_new(&mut self, key: String, value: V) {
        let index = self.bucket_of(&key);
        if let Some(chain) = self.buckets.get_mut(index) {
            chain.insert(key, value);
            self.size = self.size.saturating_add(1);
        }
    }

    /// Replaces the buckets with `capacity` empty lists and reinserts every pair
    fn rebuild(&mut self, capacity: usize) {
        let old = mem::replace(&mut self.buckets, empty_chains(capacity));
        self.size = 0;
        for (key, value) in old.into_iter().flat_map(Chain::into_pairs) {
            self.insert_new(key, value);
        }
    }

    /// Inserts a key-value pair, returning the previous value for an existing key.
    ///
    /// An existing node is unlinked and a fresh one pushed in its place. The table
    /// grows first if a new key would bring the load factor to one.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let index = self.bucket_of(&key);
        if let Some(chain) = self.buckets.get_mut(index)
            && let Some(previous) = chain.remove(&key)
        {
            chain.insert(key, value);
            return Some(previous);
        }

        if !within_load(self.size.saturating_add(1), self.buckets.len()) {
            let capacity = grow_capacity(self.buckets.len());
            log::debug!(
                "growing chained table from {} to {} buckets ({} entries)",
                self.buckets.len(),
                capacity,
                self.size
            );
            self.rebuild(capacity);
        }

        self.insert_new(key, value);
        None
    }

    /// Retrieve a value for a given key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets.get(self.bucket_of(key))?.find(key).map(|node| &node.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_of(key);
        self.buckets.get_mut(index)?.find_mut(key).map(|node| &mut node.value)
    }

    /// Returns true if `key` is stored
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Unlinks the entry for `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_of(key);
        let value = self.buckets.get_mut(index)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(value)
    }

    /// Moves every pair into a table of at least `new_capacity` buckets.
    ///
    /// The capacity is rounded up to a prime and doubled further while the pairs would
    /// load it to one or more.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::ZeroCapacity`] for a capacity of zero; the map is left
    /// untouched.
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        if new_capacity < 1 {
            log::debug!("rejected resize of chained table to zero buckets");
            return Err(ResizeError::ZeroCapacity);
        }

        let capacity = fitting_capacity(new_capacity, self.size, within_load);
        log::debug!(
            "resizing chained table from {} to {} buckets ({} requested, {} entries)",
            self.buckets.len(),
            capacity,
            new_capacity,
            self.size
        );
        self.rebuild(capacity);
        Ok(())
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedHashMap<V, H>
where
    K: Into<String>,
    H: KeyHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for ChainedHashMap<V, H>
where
    K: Into<String>,
    H: KeyHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<V: fmt::Display, H> fmt::Display for ChainedHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(f, "{index}: [")?;
            for (position, node) in chain.iter().enumerate() {
                if position > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}: {}", node.key, node.value)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl<'a, V, H> IntoIterator for &'a ChainedHashMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the pairs of a [`ChainedHashMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not visited yet
    buckets: slice::Iter<'a, Chain<V>>,
    /// List of the bucket being walked
    current: Option<ChainIter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.current.as_mut().and_then(Iterator::next) {
                return Some((node.key.as_str(), &node.value));
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }
}

impl<V> FusedIterator for Iter<'_, V> {}
