//! Open addressing with quadratic probing.

use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};

use log::{debug, error, trace};

use crate::dynamic::DictionaryType;
use crate::error::DictError;
use crate::hash::slot::Slot;
use crate::hash::{
    DefaultHashBuilder, HashConfig, check_load_factor, home_of, size_for_insert, size_for_reserve,
};
use crate::stats::{Counter, DictStats, DictStatsTrait};
use crate::utils::primes::next_prime;
use crate::Dictionary;

/// Position `i` of the probe sequence starting at `home` in a table of `m` slots.
#[inline]
fn probe(home: usize, i: usize, m: usize) -> usize {
    (home + (i * i) % m) % m
}

/// A hash table storing entries directly in a slot array.
///
/// A key is looked for at `(home + i²) % table_size` for `i = 0, 1, 2, …` until it is found
/// or an empty slot ends the search. Removal leaves a tombstone, which keeps later keys in the
/// same probe sequence reachable; tombstones are reused by insertions and dropped on rehash.
///
/// Comparisons count key equality tests against active slots. Collisions count active slots
/// holding a different key that an insertion probes past.
///
/// With a prime table size the sequence visits only about half of the slots, so a max load
/// factor above 0.5 can leave an insertion with nowhere to go. That insertion fails with
/// [`DictError::Exhausted`] and leaves the table unchanged.
#[derive(Clone)]
pub struct OpenHashTable<K, V, S = DefaultHashBuilder> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    tombstones: usize,
    max_load_factor: f32,
    hash_builder: S,
    comparisons: Counter,
    collisions: Counter,
}

impl<K, V> OpenHashTable<K, V, DefaultHashBuilder> {
    /// 19 slots, max load factor 0.5.
    pub fn new() -> Self {
        Self::build(HashConfig::open(), DefaultHashBuilder::default())
    }

    pub fn with_config(config: HashConfig) -> Result<Self, DictError> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for OpenHashTable<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OpenHashTable<K, V, S> {
    pub fn with_config_and_hasher(config: HashConfig, hash_builder: S) -> Result<Self, DictError> {
        config.validate()?;
        Ok(Self::build(config, hash_builder))
    }

    pub(crate) fn build(config: HashConfig, hash_builder: S) -> Self {
        Self {
            slots: empty_slots(next_prime(config.initial_table_size)),
            len: 0,
            tombstones: 0,
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
        self.slots.len()
    }

    /// Deleted slots not yet reused or dropped by a rehash.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.slots.len() as f32
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

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.slots.iter().filter_map(Slot::entry)
    }
}

fn empty_slots<K, V>(n: usize) -> Vec<Slot<K, V>> {
    (0..n).map(|_| Slot::Empty).collect()
}

impl<K, V, S> OpenHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn from_entries<I>(entries: I) -> Result<Self, DictError>
    where
        I: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut table = Self::build(HashConfig::open(), S::default());
        for (k, v) in entries {
            table.insert_entry(k, v)?;
        }
        Ok(table)
    }

    /// Home slot of `key`, where its probe sequence starts.
    pub fn bucket(&self, key: &K) -> usize {
        home_of(&self.hash_builder, key, self.slots.len())
    }

    /// Rebuilds the table with at least `m` slots (rounded up to a prime), keeping only the
    /// active entries. A request that would not grow the table is ignored.
    pub fn rehash(&mut self, m: usize) {
        let new_size = next_prime(m);
        if new_size <= self.slots.len() {
            return;
        }
        debug!(
            "rehashing open table: {} -> {} slots, {} entries, {} tombstones dropped",
            self.slots.len(),
            new_size,
            self.len,
            self.tombstones
        );

        let mut pending: Vec<(K, V)> = std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(Slot::into_entry)
            .collect();
        let mut size = new_size;
        self.slots = 'rebuild: loop {
            let mut slots = empty_slots(size);
            while let Some((key, value)) = pending.pop() {
                match self.vacant_slot(&slots, &key) {
                    Some(idx) => slots[idx] = Slot::Active(key, value),
                    None => {
                        // Some probe sequence is saturated; start over one size up.
                        pending.push((key, value));
                        pending.extend(slots.into_iter().filter_map(Slot::into_entry));
                        size = next_prime(size.saturating_mul(2));
                        debug!("open table rebuild saturated, retrying at {size} slots");
                        continue 'rebuild;
                    }
                }
            }
            break slots;
        };
        self.tombstones = 0;
    }

    /// Grows the table so that `n` entries fit within the max load factor.
    pub fn reserve(&mut self, n: usize) {
        match size_for_reserve(n, self.slots.len(), self.max_load_factor) {
            Some(m) => self.rehash(m),
            None => trace!("reserve({n}) fits in {} slots", self.slots.len()),
        }
    }

    pub fn set_max_load_factor(&mut self, lf: f32) -> Result<(), DictError> {
        check_load_factor(lf)?;
        debug!("open table max load factor {} -> {}", self.max_load_factor, lf);
        self.max_load_factor = lf;
        if self.load_factor() > lf {
            self.reserve(self.len);
        }
        Ok(())
    }

    /// First empty slot on `key`'s probe sequence in `slots`, which hold no tombstones and
    /// no copy of `key`.
    fn vacant_slot(&self, slots: &[Slot<K, V>], key: &K) -> Option<usize> {
        let m = slots.len();
        let home = home_of(&self.hash_builder, key, m);
        (0..m).map(|i| probe(home, i, m)).find(|&idx| {
            let active = slots[idx].is_active();
            if active {
                self.collisions.incr();
            }
            !active
        })
    }

    fn find(&self, key: &K) -> Option<usize> {
        let m = self.slots.len();
        let home = self.bucket(key);
        for i in 0..m {
            let idx = probe(home, i, m);
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Deleted => {}
                Slot::Active(k, _) => {
                    self.comparisons.incr();
                    if k == key {
                        return Some(idx);
                    }
                }
            }
        }
        None
    }

    /// Returns the slot holding `key` and whether this call stored it.
    fn insert_entry(&mut self, key: K, value: V) -> Result<(usize, bool), DictError> {
        if let Some(size) = size_for_insert(self.len, self.slots.len(), self.max_load_factor) {
            self.rehash(size);
        }

        let m = self.slots.len();
        let home = self.bucket(&key);
        let mut empty = None;
        let mut first_deleted = None;
        for i in 0..m {
            let idx = probe(home, i, m);
            match &self.slots[idx] {
                Slot::Empty => {
                    empty = Some(idx);
                    break;
                }
                Slot::Deleted => {
                    first_deleted.get_or_insert(idx);
                }
                Slot::Active(k, _) => {
                    self.comparisons.incr();
                    if *k == key {
                        return Ok((idx, false));
                    }
                    self.collisions.incr();
                }
            }
        }

        // The key is absent; prefer recycling a tombstone over claiming an empty slot.
        let Some(idx) = first_deleted.or(empty) else {
            error!("open table insertion exhausted the probe sequence in {m} slots");
            return Err(DictError::Exhausted { table_size: m });
        };
        if first_deleted.is_some() {
            self.tombstones -= 1;
        }
        self.slots[idx] = Slot::Active(key, value);
        self.len += 1;
        Ok((idx, true))
    }
}

impl<K, V, S> Dictionary<K, V> for OpenHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<bool, DictError> {
        self.insert_entry(key, value).map(|(_, inserted)| inserted)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.find(key)?;
        let Slot::Active(_, value) = std::mem::replace(&mut self.slots[idx], Slot::Deleted) else {
            return None;
        };
        self.len -= 1;
        self.tombstones += 1;
        Some(value)
    }

    fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    fn at(&self, key: &K) -> Result<&V, DictError> {
        let idx = self.find(key).ok_or(DictError::KeyNotFound)?;
        match &self.slots[idx] {
            Slot::Active(_, v) => Ok(v),
            _ => Err(DictError::KeyNotFound),
        }
    }

    fn at_mut(&mut self, key: &K) -> Result<&mut V, DictError> {
        let idx = self.find(key).ok_or(DictError::KeyNotFound)?;
        match &mut self.slots[idx] {
            Slot::Active(_, v) => Ok(v),
            _ => Err(DictError::KeyNotFound),
        }
    }

    fn get_or_insert_default(&mut self, key: K) -> Result<&mut V, DictError>
    where
        K: Clone,
        V: Default,
    {
        let idx = match self.find(&key) {
            Some(idx) => idx,
            None => self.insert_entry(key, V::default())?.0,
        };
        match &mut self.slots[idx] {
            Slot::Active(_, v) => Ok(v),
            _ => Err(DictError::KeyNotFound),
        }
    }

    fn clear(&mut self) {
        trace!(
            "clearing open table of {} entries and {} tombstones",
            self.len, self.tombstones
        );
        self.slots.fill_with(|| Slot::Empty);
        self.len = 0;
        self.tombstones = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        K: 'a,
        V: 'a,
    {
        OpenHashTable::iter(self)
    }
}

impl<K, V, S> Debug for OpenHashTable<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> DictStatsTrait for OpenHashTable<K, V, S> {
    fn get_dict_stats(&self) -> DictStats {
        DictStats::for_table(
            DictionaryType::OpenHash,
            self.len,
            &self.comparisons,
            &self.collisions,
            self.slots.len(),
        )
    }
}
