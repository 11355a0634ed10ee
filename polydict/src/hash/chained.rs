//! Separate chaining.

use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};

use log::{debug, trace};

use crate::dynamic::DictionaryType;
use crate::error::DictError;
use crate::hash::{
    DefaultHashBuilder, HashConfig, check_load_factor, home_of, size_for_insert, size_for_reserve,
};
use crate::stats::{Counter, DictStats, DictStatsTrait};
use crate::utils::primes::next_prime;
use crate::Dictionary;

/// A hash table of collision chains.
///
/// Each key lives in the chain at `hash(key) % bucket_count()`. Chains are scanned linearly:
/// every key equality test counts as a comparison, and every entry an insertion has to walk
/// past counts as a collision (including the walks done while rehashing).
///
/// ```rust
/// use polydict::{ChainedHashTable, Dictionary, HashConfig};
///
/// let config = HashConfig::chained().with_table_size(2).with_max_load_factor(0.75);
/// let mut table = ChainedHashTable::<i32, &str>::with_config(config).unwrap();
/// table.insert(1, "one").unwrap();
/// table.insert(2, "two").unwrap();
/// assert_eq!(table.bucket_count(), 5);
/// assert_eq!(table.at(&2), Ok(&"two"));
/// ```
#[derive(Clone)]
pub struct ChainedHashTable<K, V, S = DefaultHashBuilder> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    max_load_factor: f32,
    hash_builder: S,
    comparisons: Counter,
    collisions: Counter,
}

impl<K, V> ChainedHashTable<K, V, DefaultHashBuilder> {
    /// 19 buckets, max load factor 1.0.
    pub fn new() -> Self {
        Self::build(HashConfig::chained(), DefaultHashBuilder::default())
    }

    pub fn with_config(config: HashConfig) -> Result<Self, DictError> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for ChainedHashTable<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashTable<K, V, S> {
    pub fn with_config_and_hasher(config: HashConfig, hash_builder: S) -> Result<Self, DictError> {
        config.validate()?;
        Ok(Self::build(config, hash_builder))
    }

    pub(crate) fn build(config: HashConfig, hash_builder: S) -> Self {
        Self {
            buckets: (0..config.initial_table_size).map(|_| Vec::new()).collect(),
            len: 0,
            max_load_factor: config.max_load_factor,
            hash_builder,
            comparisons: Counter::new(),
            collisions: Counter::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of entries in bucket `n`.
    pub fn bucket_size(&self, n: usize) -> Result<usize, DictError> {
        self.buckets.get(n).map(Vec::len).ok_or_else(|| {
            DictError::invalid(format!(
                "bucket {n} out of range for {} buckets",
                self.buckets.len()
            ))
        })
    }

    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.buckets.len() as f32
    }

    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons.get()
    }

    pub fn collisions(&self) -> u64 {
        self.collisions.get()
    }

    pub fn reset_counters(&self) {
        self.comparisons.reset();
        self.collisions.reset();
    }

    /// Entries in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }
}

impl<K, V, S> ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut table = Self::build(HashConfig::chained(), S::default());
        table.extend(entries);
        table
    }

    /// Index of the bucket `key` belongs to.
    pub fn bucket(&self, key: &K) -> usize {
        home_of(&self.hash_builder, key, self.buckets.len())
    }

    /// Rebuilds the table with at least `m` buckets (rounded up to a prime). A request that
    /// would not grow the table is ignored.
    pub fn rehash(&mut self, m: usize) {
        let new_size = next_prime(m);
        if new_size <= self.buckets.len() {
            return;
        }
        debug!(
            "rehashing chained table: {} -> {} buckets, {} entries",
            self.buckets.len(),
            new_size,
            self.len
        );

        let old = std::mem::replace(
            &mut self.buckets,
            (0..new_size).map(|_| Vec::new()).collect(),
        );
        for (key, value) in old.into_iter().flatten() {
            let b = self.bucket(&key);
            let chain = &mut self.buckets[b];
            self.collisions.add(chain.len() as u64);
            chain.push((key, value));
        }
    }

    /// Grows the table so that `n` entries fit within the max load factor.
    pub fn reserve(&mut self, n: usize) {
        match size_for_reserve(n, self.buckets.len(), self.max_load_factor) {
            Some(m) => self.rehash(m),
            None => trace!("reserve({n}) fits in {} buckets", self.buckets.len()),
        }
    }

    pub fn set_max_load_factor(&mut self, lf: f32) -> Result<(), DictError> {
        check_load_factor(lf)?;
        debug!(
            "chained table max load factor {} -> {}",
            self.max_load_factor, lf
        );
        self.max_load_factor = lf;
        if self.load_factor() > lf {
            self.reserve(self.len);
        }
        Ok(())
    }

    /// Bucket and chain position of `key`.
    fn find(&self, key: &K) -> Option<(usize, usize)> {
        let b = self.bucket(key);
        self.buckets[b]
            .iter()
            .position(|(k, _)| {
                self.comparisons.incr();
                k == key
            })
            .map(|i| (b, i))
    }

    /// Returns the position of `key` and whether this call stored it.
    fn insert_entry(&mut self, key: K, value: V) -> (usize, usize, bool) {
        if let Some(size) = size_for_insert(self.len, self.buckets.len(), self.max_load_factor) {
            self.rehash(size);
        }

        let b = self.bucket(&key);
        let chain = &mut self.buckets[b];
        for (i, (k, _)) in chain.iter().enumerate() {
            self.comparisons.incr();
            if *k == key {
                return (b, i, false);
            }
            self.collisions.incr();
        }
        chain.push((key, value));
        self.len += 1;
        (b, chain.len() - 1, true)
    }
}

impl<K, V, S> Dictionary<K, V> for ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<bool, DictError> {
        Ok(self.insert_entry(key, value).2)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let (b, i) = self.find(key)?;
        self.len -= 1;
        Some(self.buckets[b].remove(i).1)
    }

    fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    fn at(&self, key: &K) -> Result<&V, DictError> {
        let (b, i) = self.find(key).ok_or(DictError::KeyNotFound)?;
        Ok(&self.buckets[b][i].1)
    }

    fn at_mut(&mut self, key: &K) -> Result<&mut V, DictError> {
        let (b, i) = self.find(key).ok_or(DictError::KeyNotFound)?;
        Ok(&mut self.buckets[b][i].1)
    }

    fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, DictError>
    where
        K: Clone,
        V: Default,
    {
        let (b, i) = match self.find(&key) {
            Some(pos) => pos,
            None => {
                let (b, i, _) = self.insert_entry(key, V::default());
                (b, i)
            }
        };
        Ok(&mut self.buckets[b][i].1)
    }

    fn clear(&mut self) {
        trace!("clearing chained table of {} entries", self.len);
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        K: 'a,
        V: 'a,
    {
        ChainedHashTable::iter(self)
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (k, v) in entries {
            self.insert_entry(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        Self::from_entries(entries)
    }
}

impl<K: Debug, V: Debug, S> Debug for ChainedHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> DictStatsTrait for ChainedHashTable<K, V, S> {
    fn get_dict_stats(&self) -> DictStats {
        DictStats::for_table(
            DictionaryType::ChainedHash,
            self.len,
            &self.comparisons,
            &self.collisions,
            self.buckets.len(),
        )
    }
}
