//! The mapping contract shared by both collision strategies.

use crate::{ChainedHashMap, ProbingHashMap, ResizeError, hashers::KeyHasher};

/// Operations common to [`ProbingHashMap`] and [`ChainedHashMap`].
///
/// Lets callers such as benchmarks and reports drive either strategy through one
/// code path.
pub trait HashTable<V> {
    /// Inserts or overwrites `key`, returning the previous value
    fn put(&mut self, key: String, value: V) -> Option<V>;

    /// Value stored for `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Removes `key`, returning its value
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Every stored pair, in bucket order
    fn get_keys_and_values(&self) -> Vec<(&str, &V)>;

    /// Rehashes every pair into a table of at least `new_capacity` buckets
    ///
    /// # Errors
    ///
    /// Returns a [`ResizeError`] when the request is rejected; the table is unchanged.
    fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError>;

    /// Drops every pair, keeping the capacity
    fn clear(&mut self);

    /// Buckets without an entry
    fn empty_buckets(&self) -> usize;

    /// Number of stored pairs
    fn size(&self) -> usize;

    /// Number of buckets
    fn capacity(&self) -> usize;

    /// Returns true if `key` is stored
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stored pairs per bucket
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn table_load(&self) -> f64 {
        self.size() as f64 / self.capacity() as f64
    }
}

/// Forwards every trait method to the inherent method of the same name
macro_rules! forward_hash_table {
    ($map:ident) => {
        impl<V, H: KeyHasher> HashTable<V> for $map<V, H> {
            fn put(&mut self, key: String, value: V) -> Option<V> {
                $map::put(self, key, value)
            }

            fn get(&self, key: &str) -> Option<&V> {
                $map::get(self, key)
            }

            fn remove(&mut self, key: &str) -> Option<V> {
                $map::remove(self, key)
            }

            fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
                $map::get_keys_and_values(self)
            }

            fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
                $map::resize_table(self, new_capacity)
            }

            fn clear(&mut self) {
                $map::clear(self);
            }

            fn empty_buckets(&self) -> usize {
                $map::empty_buckets(self)
            }

            fn size(&self) -> usize {
                $map::size(self)
            }

            fn capacity(&self) -> usize {
                $map::capacity(self)
            }

            fn contains_key(&self, key: &str) -> bool {
                $map::contains_key(self, key)
            }
        }
    };
}

forward_hash_table!(ProbingHashMap);
forward_hash_table!(ChainedHashMap);
