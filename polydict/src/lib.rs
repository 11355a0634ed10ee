//! Interchangeable dictionary engines.
//!
//! Four key-value containers implement the same [`Dictionary`] contract:
//!
//! - [`AvlTree`]: height-balanced binary search tree
//! - [`RedBlackTree`]: color-balanced binary search tree over a node arena with a nil sentinel
//! - [`ChainedHashTable`]: prime-sized array of collision chains
//! - [`OpenHashTable`]: prime-sized slot array with quadratic probing and tombstones
//!
//! [`DynamicDictionary`] picks one of them at runtime from a [`DictionaryType`] and forwards
//! every call. Each engine counts its comparisons, and either its rotations (trees) or its
//! collisions (hash tables); see [`stats`].
//!
//! ```rust
//! use polydict::{Dictionary, DictionaryType, DynamicDictionary};
//!
//! let mut counts = DynamicDictionary::<String, u32>::new(DictionaryType::RedBlack);
//! for word in "the cat and the hat".split_whitespace() {
//!     *counts.get_or_insert_default(word.to_string()).unwrap() += 1;
//! }
//! assert_eq!(counts.at(&"the".to_string()), Ok(&2));
//! assert_eq!(counts.len(), 4);
//! ```

pub use crate::avl::AvlTree;
pub use crate::dynamic::{DictionaryType, DynamicDictionary, create_dictionary};
pub use crate::error::DictError;
pub use crate::hash::chained::ChainedHashTable;
pub use crate::hash::open::OpenHashTable;
pub use crate::hash::{DefaultHashBuilder, HashConfig};
pub use crate::rbtree::RedBlackTree;
pub use crate::stats::{DictStats, DictStatsTrait};

pub mod avl;
pub mod dynamic;
pub mod error;
pub mod hash;
pub mod iter;
pub mod rbtree;
pub mod stats;
pub mod utils;

#[cfg(test)]
mod proptests;

/// The contract shared by every engine.
///
/// Keys are unique. Inserting a key that is already present and removing a key that is
/// absent are silent no-ops; only lookups that require the key (`at`, `at_mut`, `update`)
/// fail, with [`DictError::KeyNotFound`].
pub trait Dictionary<K, V> {
    /// Inserts `key` unless it is already present.
    ///
    /// Returns `Ok(true)` when the entry was added and `Ok(false)` when the key existed, in
    /// which case the stored value is left untouched.
    fn insert(&mut self, key: K, value: V) -> Result<bool, DictError>;

    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Replaces the value stored under an existing key.
    fn update(&mut self, key: &K, value: V) -> Result<(), DictError> {
        *self.at_mut(key)? = value;
        Ok(())
    }

    fn contains(&self, key: &K) -> bool;

    fn at(&self, key: &K) -> Result<&V, DictError>;

    fn at_mut(&mut self, key: &K) -> Result<&mut V, DictError>;

    /// Returns the value stored under `key`, first inserting `V::default()` if the key is
    /// absent. This is the counting workhorse: `*dict.get_or_insert_default(word)? += 1`.
    fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, DictError>
    where
        K: Clone,
        V: Default;

    /// Removes every entry. Instrumentation counters keep their values.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all entries. Trees yield keys in ascending order; hash tables yield
    /// them in table order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        K: 'a,
        V: 'a;

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }
}
