use std::{fmt, iter::FusedIterator, mem};

use crate::{
    error::ResizeError,
    hashers::{KeyHasher, SumHasher, bucket_index},
    prime::{fitting_capacity, grow_capacity, next_prime},
};

/// Bucket count used by `new` and `default`
const DEFAULT_CAPACITY: usize = 11;

/// A key-value pair stored in a slot of a [`ProbingHashMap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

impl<V> Entry<V> {
    /// The entry's key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The entry's value
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V: fmt::Display> fmt::Display for Entry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K: {} V: {}", self.key, self.value)
    }
}

/// State of a single bucket
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never written since the array was allocated; ends a probe sequence
    Empty,
    /// Holds a live entry
    Occupied(Entry<V>),
    /// A removed entry; probing continues past it and insertion may reuse it
    Tombstone,
}

/// Slot indices `home + i²` (mod capacity) for `i` in `0..capacity`
#[derive(Debug, Clone)]
struct QuadraticProbe {
    /// The slot the key hashes to
    home: usize,
    /// `i²` reduced modulo the capacity
    offset: usize,
    /// Current `i`
    step: usize,
    /// Number of buckets in the table
    capacity: usize,
}

impl QuadraticProbe {
    /// Starts a probe sequence at `home`
    fn new(home: usize, capacity: usize) -> Self {
        Self { home, offset: 0, step: 0, capacity }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.capacity {
            return None;
        }
        let index = (self.home + self.offset) % self.capacity;
        // (i + 1)² = i² + 2i + 1
        self.offset = (self.offset + 2 * self.step + 1) % self.capacity;
        self.step += 1;
        Some(index)
    }
}

/// Whether `live` entries keep a table of `capacity` buckets at or below half load
fn within_load(live: usize, capacity: usize) -> bool {
    live.saturating_mul(2) <= capacity
}

/// Allocates `capacity` empty slots
fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// A string-keyed hash map using open addressing with quadratic probing.
///
/// The bucket count is always prime. Removed entries leave a tombstone behind so that
/// keys stored further along a probe sequence stay reachable. The table grows to the
/// next prime above twice its capacity before an insertion would push the load factor
/// past 0.5.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ProbingHashMap<V, H = SumHasher> {
    /// The buckets storing the entries
    slots: Vec<Slot<V>>,
    /// Number of live entries
    size: usize,
    /// Hash function used to find a key's home slot
    hasher: H,
}

impl<V> ProbingHashMap<V> {
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

impl<V, H: Default> Default for ProbingHashMap<V, H> {
    fn default() -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, H::default())
    }
}

impl<V, H> ProbingHashMap<V, H> {
    /// Creates an empty map with at least `capacity` buckets using `hasher`
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self { slots: empty_slots(next_prime(capacity)), size: 0, hasher }
    }

    /// Number of live entries
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
        self.slots.len()
    }

    /// Returns the current load factor
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Buckets without a live entry; tombstones count as empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.slots.len().saturating_sub(self.size)
    }

    /// Drops every entry, keeping the current capacity
    pub fn clear(&mut self) {
        log::trace!("clearing probing table of {} buckets", self.slots.len());
        self.slots = empty_slots(self.slots.len());
        self.size = 0;
    }

    /// Returns an iterator over the live entries in slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: &self.slots, index: 0 }
    }

    /// Collects every live key-value pair in slot order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().map(|entry| (entry.key(), entry.value())).collect()
    }
}

impl<V, H: KeyHasher> ProbingHashMap<V, H> {
    /// Probe sequence for `key` in the current table
    fn probe(&self, key: &str) -> QuadraticProbe {
        let capacity = self.slots.len();
        QuadraticProbe::new(bucket_index(self.hasher.hash_key(key), capacity), capacity)
    }

    /// Index of the live slot holding `key`.
    ///
    /// Tombstones are skipped, an empty slot ends the search.
    fn find(&self, key: &str) -> Option<usize> {
        for index in self.probe(key) {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Writes an entry whose key is not in the table into the first free slot of its
    /// probe sequence. Doesn't check the load factor.
    fn insert_new(&mut self, entry: Entry<V>) {
        let vacant = self
            .probe(&entry.key)
            .find(|&index| !matches!(self.slots.get(index), Some(Slot::Occupied(_))));

        if let Some(slot) = vacant.and_then(|index| self.slots.get_mut(index)) {
            *slot = Slot::Occupied(entry);
            self.size = self.size.saturating_add(1);
        } else {
            // unreachable while the load stays at or below one half
            log::error!("no free slot for {:?} in {} buckets", entry.key, self.slots.len());
        }
    }

    /// Replaces the bucket array with `capacity` fresh slots and reinserts the live entries
    fn rebuild(&mut self, capacity: usize) {
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.size = 0;
        for slot in old {
            if let Slot::Occupied(entry) = slot {
                self.insert_new(entry);
            }
        }
    }

    /// Inserts a key-value pair, returning the previous value for an existing key.
    ///
    /// The table grows first if the new entry would push the load factor past 0.5.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(current) = self.get_mut(&key) {
            return Some(mem::replace(current, value));
        }

        if !within_load(self.size.saturating_add(1), self.slots.len()) {
            let capacity = grow_capacity(self.slots.len());
            log::debug!(
                "growing probing table from {} to {} buckets ({} entries)",
                self.slots.len(),
                capacity,
                self.size
            );
            self.rebuild(capacity);
        }

        self.insert_new(Entry { key, value });
        None
    }

    /// Retrieve a value for a given key
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.find(key)?)? {
            Slot::Occupied(entry) => Some(&entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied(entry) => Some(&mut entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns true if `key` has a live entry
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Tombstones the entry for `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                Some(entry.value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Moves every live entry into a table of at least `new_capacity` buckets.
    ///
    /// The capacity is rounded up to a prime and doubled further if the entries would
    /// otherwise load it past one half. Tombstones are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::BelowLiveCount`] if `new_capacity` is smaller than the
    /// number of entries; the map is left untouched.
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        if new_capacity < self.size {
            log::debug!(
                "rejected resize of probing table to {} buckets holding {} entries",
                new_capacity,
                self.size
            );
            return Err(ResizeError::BelowLiveCount { requested: new_capacity, live: self.size });
        }

        let capacity = fitting_capacity(new_capacity, self.size, within_load);
        log::debug!(
            "resizing probing table from {} to {} buckets ({} requested, {} entries)",
            self.slots.len(),
            capacity,
            new_capacity,
            self.size
        );
        self.rebuild(capacity);
        Ok(())
    }
}

impl<K, V, H> Extend<(K, V)> for ProbingHashMap<V, H>
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

impl<K, V, H> FromIterator<(K, V)> for ProbingHashMap<V, H>
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

impl<V: fmt::Display, H> fmt::Display for ProbingHashMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Tombstone => writeln!(f, "{index}: Tombstone")?,
                Slot::Occupied(entry) => writeln!(f, "{index}: {entry}")?,
            }
        }
        Ok(())
    }
}

impl<'a, V, H> IntoIterator for &'a ProbingHashMap<V, H> {
    type Item = &'a Entry<V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the live entries of a [`ProbingHashMap`], in ascending slot order.
///
/// Finishes immediately when the map has no live entry.
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// The map's buckets
    slots: &'a [Slot<V>],
    /// Next slot to inspect
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.get(self.index) {
            self.index = self.index.saturating_add(1);
            if let Slot::Occupied(entry) = slot {
                return Some(entry);
            }
        }
        None
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::{PositionalHasher, prime::is_prime};

    /// Sends every key to slot 0 so that all of them share one probe sequence
    fn colliding() -> impl Fn(&str) -> u64 {
        |_: &str| 0u64
    }

    #[test]
    fn test_put_and_get() {
        let mut map = ProbingHashMap::new();
        assert_eq!(map.put("key1", 1), None);
        assert_eq!(map.put("key2", 2), None);
        assert_eq!(map.put("key3", 3), None);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
        assert_eq!(map.capacity(), 11);
    }

    #[test]
    fn test_update() {
        let mut map = ProbingHashMap::with_capacity(101);
        map.put("key1", 10);
        map.put("key2", 20);
        assert_eq!(map.put("key1", 30), Some(10));
        assert_eq!(map.get("key1"), Some(&30));
        assert_eq!(map.size(), 2);
        assert_eq!(map.empty_buckets(), 99);
    }

    #[test]
    fn test_remove() {
        let mut map = ProbingHashMap::with_capacity(53);
        map.put("key1", 1);
        map.put("key2", 2);

        assert_eq!(map.remove("key1"), Some(1));
        assert_eq!(map.get("key1"), None);
        assert!(!map.contains_key("key1"));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.size(), 1);

        assert_eq!(map.remove("key1"), None);
        assert_eq!(map.remove("key4"), None);
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn test_tombstone_keeps_probe_chain() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(11, colliding());
        map.put("a", 1); // slot 0
        map.put("b", 2); // slot 1
        map.put("c", 3); // slot 4

        assert_eq!(map.remove("b"), Some(2));
        assert_eq!(map.get("c"), Some(&3));
        assert!(!map.contains_key("b"));

        // the tombstone at slot 1 is reused by the next new key
        map.put("d", 4);
        assert_eq!(map.to_string().lines().nth(1), Some("1: K: d V: 4"));

        // overwriting "c" must not duplicate it into a reusable slot
        map.remove("d");
        assert_eq!(map.put("c", 30), Some(3));
        assert_eq!(map.size(), 2);
        assert_eq!(map.iter().filter(|entry| entry.key() == "c").count(), 1);
        assert_eq!(map.get("c"), Some(&30));
    }

    #[test]
    fn test_put_grows_before_half_load() {
        let mut map = ProbingHashMap::with_capacity(11);
        for i in 1..=5 {
            map.put(i.to_string(), i * 10);
        }
        assert_eq!(map.capacity(), 11);

        map.put("6", 60);
        assert_eq!(map.capacity(), 23);
        assert_eq!(map.size(), 6);
        for i in 1..=6 {
            assert_eq!(map.get(&i.to_string()), Some(&(i * 10)));
        }
    }

    #[test]
    fn test_load_factor_bound_while_filling() {
        let mut map = ProbingHashMap::with_capacity(53);
        for i in 0..150 {
            map.put(format!("str{i}"), i * 100);
            assert!(map.table_load() <= 0.5);
            assert!(is_prime(map.capacity()));
            assert_eq!(map.empty_buckets() + map.size(), map.capacity());
        }
        assert_eq!(map.size(), 150);
    }

    #[test]
    fn test_repeated_keys() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(41, PositionalHasher);
        for i in 0..50 {
            map.put(format!("str{}", i / 3), i * 100);
        }
        assert_eq!(map.size(), 17);
        assert_eq!(map.get("str16"), Some(&4900));
    }

    #[test]
    fn test_resize() {
        let mut map = ProbingHashMap::with_capacity(20);
        map.put("key1", 10);
        assert_eq!(map.capacity(), 23);

        assert_eq!(map.resize_table(30), Ok(()));
        assert_eq!(map.capacity(), 31);
        assert_eq!(map.size(), 1);
        assert_eq!(map.get("key1"), Some(&10));
    }

    #[test]
    fn test_resize_keeps_half_load() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(75, PositionalHasher);
        let keys: Vec<u32> = (25..1000).step_by(13).collect();
        for &key in &keys {
            map.put(key.to_string(), key * 42);
        }

        for capacity in (111..1000).step_by(117) {
            assert_eq!(map.resize_table(capacity), Ok(()));
            assert!(map.table_load() <= 0.5);
            assert!(map.capacity() >= capacity);

            map.put("some key", 0);
            assert!(map.contains_key("some key"));
            map.remove("some key");

            for &key in &keys {
                assert_eq!(map.get(&key.to_string()), Some(&(key * 42)));
                assert!(!map.contains_key(&(key + 1).to_string()));
            }
            assert_eq!(map.size(), keys.len());
        }
    }

    #[test]
    fn test_resize_rejected_below_size() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(11, PositionalHasher);
        for i in 1..=5 {
            map.put(i.to_string(), (i * 10).to_string());
        }

        assert_eq!(
            map.resize_table(2),
            Err(ResizeError::BelowLiveCount { requested: 2, live: 5 })
        );
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.size(), 5);

        map.put("20", "200".to_string());
        map.remove("1");
        assert_eq!(map.resize_table(12), Ok(()));

        let mut pairs: Vec<(String, String)> = map
            .get_keys_and_values()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        pairs.sort();
        let expected: Vec<(String, String)> =
            [("2", "20"), ("20", "200"), ("3", "30"), ("4", "40"), ("5", "50")]
                .iter()
                .map(|&(key, value)| (key.to_string(), value.to_string()))
                .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_get_keys_and_values() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(11, PositionalHasher);
        for i in 1..=5 {
            map.put(i.to_string(), (i * 10).to_string());
        }

        let mut pairs = map.get_keys_and_values();
        pairs.sort_unstable();
        let ten = "10".to_string();
        let twenty = "20".to_string();
        let thirty = "30".to_string();
        let forty = "40".to_string();
        let fifty = "50".to_string();
        assert_eq!(
            pairs,
            vec![("1", &ten), ("2", &twenty), ("3", &thirty), ("4", &forty), ("5", &fifty)]
        );
    }

    #[test]
    fn test_clear() {
        let mut map = ProbingHashMap::with_capacity(53);
        map.put("key1", 10);
        map.put("key2", 20);
        assert_eq!(map.resize_table(100), Ok(()));
        assert_eq!(map.capacity(), 101);

        map.clear();

        assert_eq!(map.size(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 101);
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.empty_buckets(), 101);
    }

    #[test]
    fn test_iter() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(10, PositionalHasher);
        for i in 0..5 {
            map.put(i.to_string(), i * 24);
        }
        map.remove("0");
        map.remove("4");

        let mut keys: Vec<&str> = map.iter().map(Entry::key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["1", "2", "3"]);
        assert_eq!((&map).into_iter().map(|entry| entry.value()).sum::<i32>(), 24 * 6);
    }

    #[test]
    fn test_iter_on_empty_map() {
        let mut map: ProbingHashMap<i32> = ProbingHashMap::new();
        assert_eq!(map.iter().next(), None);

        map.put("gone", 1);
        map.remove("gone");
        let mut iter = map.iter();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ProbingHashMap::new();
        map.put("key1", 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
    }

    #[test]
    fn test_display_lists_every_bucket() {
        let mut map = ProbingHashMap::with_capacity_and_hasher(3, colliding());
        map.put("a", 1);
        assert_eq!(map.to_string(), "0: K: a V: 1\n1: None\n2: None\n");
    }

    #[test]
    fn test_collect_and_extend() {
        let mut map: ProbingHashMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        map.extend([("c", 3), ("a", 10)]);
        assert_eq!(map.size(), 3);
        assert_eq!(map.get("a"), Some(&10));
    }

    /// Single map operation for model-based testing
    #[derive(Debug, Clone)]
    enum Op {
        Put(String, u32),
        Remove(String),
        Resize(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => ("[a-f]{1,3}", any::<u32>()).prop_map(|(key, value)| Op::Put(key, value)),
            2 => "[a-f]{1,3}".prop_map(Op::Remove),
            1 => (0usize..80).prop_map(Op::Resize),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_std_hashmap(
            ops in prop::collection::vec(op(), 1..200),
            initial in 0usize..40,
        ) {
            let mut map = ProbingHashMap::with_capacity_and_hasher(initial, PositionalHasher);
            let mut model = HashMap::new();

            for op in ops {
                match op {
                    Op::Put(key, value) => {
                        let before = map.size();
                        let fresh = !model.contains_key(&key);
                        let previous = model.insert(key.clone(), value);
                        prop_assert_eq!(map.put(key.clone(), value), previous);
                        prop_assert_eq!(map.get(&key), Some(&value));
                        prop_assert_eq!(map.size(), before + usize::from(fresh));
                        prop_assert!(map.table_load() <= 0.5);
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(map.remove(&key), model.remove(&key));
                        prop_assert!(!map.contains_key(&key));
                        prop_assert_eq!(map.remove(&key), None);
                    }
                    Op::Resize(capacity) => {
                        let before = map.capacity();
                        let result = map.resize_table(capacity);
                        if capacity < model.len() {
                            prop_assert!(result.is_err());
                            prop_assert_eq!(map.capacity(), before);
                        } else {
                            prop_assert!(result.is_ok());
                            prop_assert!(map.capacity() >= capacity);
                        }
                    }
                }

                prop_assert_eq!(map.size(), model.len());
                prop_assert_eq!(map.empty_buckets() + map.size(), map.capacity());
                prop_assert!(is_prime(map.capacity()));
            }

            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
            prop_assert_eq!(map.iter().count(), model.len());
        }
    }
}
