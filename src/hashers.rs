//! Key hashing for the bucket arrays.
//!
//! The maps never hash keys themselves; they ask a [`KeyHasher`] for an unsigned
//! integer and reduce it modulo the current capacity. Any `Fn(&str) -> u64` is a
//! hasher, so the two reference functions below can be swapped for a closure.

/// Maps a text key to an unsigned integer
pub trait KeyHasher {
    /// Hashes `key`. The result does not need to be uniform.
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sums the Unicode scalar values of the key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumHasher;

impl SumHasher {
    /// Hashes `key` as the wrapping sum of its characters
    #[must_use]
    pub fn hash(key: &str) -> u64 {
        key.chars().fold(0u64, |acc, c| acc.wrapping_add(u64::from(u32::from(c))))
    }
}

/// Sums each character weighted by its 1-based position in the key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionalHasher;

impl PositionalHasher {
    /// Hashes `key` as the wrapping sum of `position * character`
    #[must_use]
    pub fn hash(key: &str) -> u64 {
        key.chars().zip(1u64..).fold(0u64, |acc, (c, position)| {
            acc.wrapping_add(position.wrapping_mul(u64::from(u32::from(c))))
        })
    }
}

// Unit structs are not `Fn`, so these don't overlap with the closure impl.
impl KeyHasher for SumHasher {
    fn hash_key(&self, key: &str) -> u64 {
        Self::hash(key)
    }
}

impl KeyHasher for PositionalHasher {
    fn hash_key(&self, key: &str) -> u64 {
        Self::hash(key)
    }
}

/// Reduces a hash to the home slot of a table with `capacity` buckets
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    // capacity is always a prime, never zero
    (hash % capacity as u64) as usize
}
