use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};

use crate::{ChainedHashMap, KeyHasher, ProbingHashMap};

/// Bounds on pre-allocation from untrusted size hints
mod size_hint {
    use std::cmp;

    /// This presumably exists to prevent denial of service attacks.
    ///
    /// Original discussion: <https://github.com/serde-rs/serde/issues/1114>.
    #[inline]
    pub(super) fn cautious(hint: Option<usize>) -> usize {
        cmp::min(hint.unwrap_or(0), 4096)
    }
}

impl<V: Serialize, H> Serialize for ProbingHashMap<V, H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter().map(|entry| (entry.key(), entry.value())))
    }
}

impl<V: Serialize, H> Serialize for ChainedHashMap<V, H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Capacity request keeping `entries` at or below half load
fn probing_buckets(entries: usize) -> usize {
    entries.saturating_mul(2)
}

/// Capacity request keeping `entries` below full load
fn chained_buckets(entries: usize) -> usize {
    entries.saturating_add(1)
}

/// Generates a `Deserialize` impl that reads a map and puts every pair.
///
/// `$buckets` turns the cautious entry count into a requested capacity.
macro_rules! deserialize_table {
    ($map:ident, $buckets:ident) => {
        impl<'de, V, H> Deserialize<'de> for $map<V, H>
        where
            V: Deserialize<'de>,
            H: KeyHasher + Default,
        {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct MapVisitor<V, H> {
                    marker: PhantomData<$map<V, H>>,
                }

                impl<'de, V, H> Visitor<'de> for MapVisitor<V, H>
                where
                    V: Deserialize<'de>,
                    H: KeyHasher + Default,
                {
                    type Value = $map<V, H>;

                    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                        formatter.write_str("a map with string keys")
                    }

                    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                    where
                        M: MapAccess<'de>,
                    {
                        let entries = size_hint::cautious(map.size_hint());
                        let mut values =
                            $map::with_capacity_and_hasher($buckets(entries), H::default());

                        while let Some((key, value)) = map.next_entry::<String, V>()? {
                            values.put(key, value);
                        }

                        Ok(values)
                    }
                }

                let visitor = MapVisitor { marker: PhantomData };
                deserializer.deserialize_map(visitor)
            }
        }
    };
}

deserialize_table!(ProbingHashMap, probing_buckets);
deserialize_table!(ChainedHashMap, chained_buckets);
