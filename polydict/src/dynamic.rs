//! Runtime selection of a dictionary engine.

use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

use log::debug;

use crate::avl::AvlTree;
use crate::error::DictError;
use crate::hash::chained::ChainedHashTable;
use crate::hash::open::OpenHashTable;
use crate::hash::{DefaultHashBuilder, HashConfig};
use crate::rbtree::RedBlackTree;
use crate::stats::{DictStats, DictStatsTrait};
use crate::Dictionary;

/// The four engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DictionaryType {
    Avl,
    RedBlack,
    ChainedHash,
    OpenHash,
}

impl DictionaryType {
    pub const ALL: [DictionaryType; 4] = [
        DictionaryType::Avl,
        DictionaryType::RedBlack,
        DictionaryType::ChainedHash,
        DictionaryType::OpenHash,
    ];

    /// Trees iterate in key order and count rotations; hash tables count collisions.
    pub fn is_tree(self) -> bool {
        matches!(self, DictionaryType::Avl | DictionaryType::RedBlack)
    }

    pub fn name(self) -> &'static str {
        match self {
            DictionaryType::Avl => "AVL",
            DictionaryType::RedBlack => "RBTREE",
            DictionaryType::ChainedHash => "CHAINING_HASH",
            DictionaryType::OpenHash => "OPEN_ADDRESSING_HASH",
        }
    }
}

impl fmt::Display for DictionaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DictionaryType {
    type Err = DictError;

    /// Accepts the short and long engine names, case-insensitively, as well as the names
    /// produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avl" | "avltree" => Ok(DictionaryType::Avl),
            "rbt" | "rbtree" => Ok(DictionaryType::RedBlack),
            "chash" | "hashtable" | "chaining_hash" => Ok(DictionaryType::ChainedHash),
            "ohash" | "openhashtable" | "open_addressing_hash" => Ok(DictionaryType::OpenHash),
            _ => Err(DictError::invalid(format!("unknown dictionary type '{s}'"))),
        }
    }
}

/// One of the four engines, chosen at runtime. Every [`Dictionary`] call is forwarded to the
/// engine inside; cloning clones the engine.
#[derive(Clone)]
pub enum DynamicDictionary<K, V, S = DefaultHashBuilder> {
    Avl(AvlTree<K, V>),
    RedBlack(RedBlackTree<K, V>),
    ChainedHash(ChainedHashTable<K, V, S>),
    OpenHash(OpenHashTable<K, V, S>),
}

macro_rules! forward {
    ($self:expr, $engine:ident => $body:expr) => {
        match $self {
            DynamicDictionary::Avl($engine) => $body,
            DynamicDictionary::RedBlack($engine) => $body,
            DynamicDictionary::ChainedHash($engine) => $body,
            DynamicDictionary::OpenHash($engine) => $body,
        }
    };
}

impl<K, V> DynamicDictionary<K, V, DefaultHashBuilder> {
    /// An empty engine of the given kind; hash engines get their default configuration.
    pub fn new(kind: DictionaryType) -> Self {
        Self::with_hasher(kind, DefaultHashBuilder::default())
    }
}

impl<K, V, S> DynamicDictionary<K, V, S> {
    pub fn with_hasher(kind: DictionaryType, hash_builder: S) -> Self {
        debug!("constructing {kind} dictionary");
        match kind {
            DictionaryType::Avl => DynamicDictionary::Avl(AvlTree::new()),
            DictionaryType::RedBlack => DynamicDictionary::RedBlack(RedBlackTree::new()),
            DictionaryType::ChainedHash => DynamicDictionary::ChainedHash(
                ChainedHashTable::build(HashConfig::chained(), hash_builder),
            ),
            DictionaryType::OpenHash => {
                DynamicDictionary::OpenHash(OpenHashTable::build(HashConfig::open(), hash_builder))
            }
        }
    }

    pub fn kind(&self) -> DictionaryType {
        match self {
            DynamicDictionary::Avl(_) => DictionaryType::Avl,
            DynamicDictionary::RedBlack(_) => DictionaryType::RedBlack,
            DynamicDictionary::ChainedHash(_) => DictionaryType::ChainedHash,
            DynamicDictionary::OpenHash(_) => DictionaryType::OpenHash,
        }
    }

    pub fn comparisons(&self) -> u64 {
        forward!(self, d => d.comparisons())
    }

    /// Rotations, for the tree engines.
    pub fn rotations(&self) -> Option<u64> {
        match self {
            DynamicDictionary::Avl(d) => Some(d.rotations()),
            DynamicDictionary::RedBlack(d) => Some(d.rotations()),
            _ => None,
        }
    }

    /// Collisions, for the hash engines.
    pub fn collisions(&self) -> Option<u64> {
        match self {
            DynamicDictionary::ChainedHash(d) => Some(d.collisions()),
            DynamicDictionary::OpenHash(d) => Some(d.collisions()),
            _ => None,
        }
    }

    pub fn reset_counters(&self) {
        forward!(self, d => d.reset_counters())
    }
}

impl<K, V, S> DynamicDictionary<K, V, S>
where
    K: Ord + Hash + Eq,
    S: BuildHasher,
{
    /// An engine of the given kind holding `entries`; the first occurrence of a repeated key
    /// wins.
    pub fn with_entries<I>(kind: DictionaryType, entries: I) -> Result<Self, DictError>
    where
        I: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut dict = Self::with_hasher(kind, S::default());
        for (k, v) in entries {
            dict.insert(k, v)?;
        }
        Ok(dict)
    }
}

/// Builds an empty engine from its name (`avl`, `rbtree`, `chash`, `ohash` and their
/// aliases). An unknown name is an [`DictError::InvalidArgument`].
pub fn create_dictionary<K, V>(name: &str) -> Result<DynamicDictionary<K, V>, DictError> {
    let kind: DictionaryType = name.parse()?;
    Ok(DynamicDictionary::new(kind))
}

impl<K, V, S> Dictionary<K, V> for DynamicDictionary<K, V, S>
where
    K: Ord + Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<bool, DictError> {
        forward!(self, d => d.insert(key, value))
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        forward!(self, d => d.remove(key))
    }

    fn update(&mut self, key: &K, value: V) -> Result<(), DictError> {
        forward!(self, d => d.update(key, value))
    }

    fn contains(&self, key: &K) -> bool {
        forward!(self, d => d.contains(key))
    }

    fn at(&self, key: &K) -> Result<&V, DictError> {
        forward!(self, d => d.at(key))
    }

    fn at_mut(&mut self, key: &K) -> Result<&mut V, DictError> {
        forward!(self, d => d.at_mut(key))
    }

    fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, DictError>
    where
        K: Clone,
        V: Default,
    {
        forward!(self, d => d.get_or_insert_default(key))
    }

    fn clear(&mut self) {
        forward!(self, d => Dictionary::clear(d))
    }

    fn len(&self) -> usize {
        forward!(self, d => d.len())
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        K: 'a,
        V: 'a,
    {
        let iter: Box<dyn Iterator<Item = (&K, &V)> + '_> = match self {
            DynamicDictionary::Avl(d) => Box::new(d.iter()),
            DynamicDictionary::RedBlack(d) => Box::new(d.iter()),
            DynamicDictionary::ChainedHash(d) => Box::new(d.iter()),
            DynamicDictionary::OpenHash(d) => Box::new(d.iter()),
        };
        iter
    }
}

impl<K: Debug, V: Debug, S> Debug for DynamicDictionary<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        forward!(self, d => d.fmt(f))
    }
}

impl<K, V, S> DictStatsTrait for DynamicDictionary<K, V, S> {
    fn get_dict_stats(&self) -> DictStats {
        forward!(self, d => d.get_dict_stats())
    }
}
