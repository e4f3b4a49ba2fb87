//! # Prime Table
//!
//! String-keyed hash maps over prime-sized bucket arrays.
//!
//! This crate provides two hash map implementations with the same contract:
//!
//! - `ProbingHashMap`: open addressing with quadratic probing (`home + i²`) and
//!   tombstone deletion, kept at or below half load
//! - `ChainedHashMap`: separate chaining with a singly-linked list per bucket, kept
//!   below full load
//!
//! Both round every capacity up to a prime, grow to the next prime above twice their
//! capacity when the load threshold is reached, and take the hash function as a
//! parameter (see [`KeyHasher`]).
//!
//! ## Basic Usage
//!
//! ```rust
//! use primetable::ProbingHashMap;
//!
//! // Create a new hash map with 11 buckets
//! let mut map = ProbingHashMap::new();
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//! assert_eq!(map.size(), 2);
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! assert!(map.table_load() <= 0.5);
//! ```
//!
//! ## Chaining and Custom Hashers
//!
//! ```rust
//! use primetable::{ChainedHashMap, PositionalHasher, find_mode};
//!
//! let mut map = ChainedHashMap::with_capacity_and_hasher(20, PositionalHasher);
//! assert_eq!(map.capacity(), 23);
//!
//! for i in 0..30 {
//!     map.put(format!("key{i}"), i);
//! }
//! assert!(map.table_load() < 1.0);
//!
//! // any `Fn(&str) -> u64` works as a hasher
//! let mut lengths = ChainedHashMap::with_capacity_and_hasher(7, |key: &str| key.len() as u64);
//! lengths.put("one", 1);
//! assert!(lengths.contains_key("one"));
//!
//! let (mode, frequency) = find_mode(["apple", "apple", "grape"]);
//! assert_eq!((mode, frequency), (vec!["apple".to_string()], 2));
//! ```

/// Singly-linked collision lists for the chained map
mod chain;
/// Module implementing the separate chaining hash map
mod chained_hashmap;
/// Resize rejection errors
mod error;
/// Hash capability and the reference hash functions
pub mod hashers;
/// Prime sizing of bucket arrays
pub mod prime;
/// Module implementing the open addressing hash map
mod probing_hashmap;
/// `Serialize` and `Deserialize` for both maps
#[cfg(feature = "serde")]
mod serde;
/// The contract shared by both maps
mod table;
/// Utility functions and traits for the hash maps
mod utils;

pub use chained_hashmap::{ChainedHashMap, Iter as ChainedIter};
pub use error::ResizeError;
pub use hashers::{KeyHasher, PositionalHasher, SumHasher};
pub use probing_hashmap::{Entry, Iter as ProbingIter, ProbingHashMap};
pub use table::HashTable;
pub use utils::{HashMapExtensions, find_mode, from_iter};
