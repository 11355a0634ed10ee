//! Instrumentation for the dictionary engines.
//!
//! Every engine counts the work it does so that the engines can be compared empirically:
//! - key comparisons, for all engines
//! - rotations, for the two balanced trees
//! - collisions, for the two hash tables
//!
//! Counters live inside each instance (never process-global), so independent dictionaries
//! driven from different threads never disturb each other's numbers.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;

use crate::dynamic::DictionaryType;

/// A monotonically increasing event counter.
///
/// Lookups take `&self` but still have to count their comparisons, so the value sits in a
/// `Cell`. This keeps a dictionary `Send` but not `Sync`.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Counter(Cell<u64>);

impl Counter {
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn incr(&self) {
        self.add(1);
    }

    #[inline]
    pub fn add(&self, n: u64) {
        self.0.set(self.0.get().wrapping_add(n));
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    pub fn reset(&self) {
        self.0.set(0);
    }

    /// Three-way key comparison as the trees count it: a hit costs one comparison (the
    /// equality test), a miss costs two (equality, then ordering).
    #[inline]
    pub(crate) fn compare<K: Ord>(&self, key: &K, other: &K) -> Ordering {
        let ord = key.cmp(other);
        self.add(if ord == Ordering::Equal { 1 } else { 2 });
        ord
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

pub trait DictStatsTrait {
    fn get_dict_stats(&self) -> DictStats;
}

/// A point-in-time snapshot of an engine's shape and counters.
///
/// Engine-specific parts are `None` where they do not apply: `rotations` and `max_height`
/// only exist for trees, `collisions`, `table_size` and `load_factor` only for hash tables.
#[derive(Debug, Clone, PartialEq)]
pub struct DictStats {
    pub structure: DictionaryType,
    pub num_entries: usize,
    pub comparisons: u64,
    pub rotations: Option<u64>,
    pub collisions: Option<u64>,
    pub max_height: Option<usize>,
    pub table_size: Option<usize>,
    pub load_factor: Option<f32>,
}

impl DictStats {
    pub(crate) fn for_tree(
        structure: DictionaryType,
        num_entries: usize,
        comparisons: &Counter,
        rotations: &Counter,
        max_height: usize,
    ) -> Self {
        Self {
            structure,
            num_entries,
            comparisons: comparisons.get(),
            rotations: Some(rotations.get()),
            collisions: None,
            max_height: Some(max_height),
            table_size: None,
            load_factor: None,
        }
    }

    pub(crate) fn for_table(
        structure: DictionaryType,
        num_entries: usize,
        comparisons: &Counter,
        collisions: &Counter,
        table_size: usize,
    ) -> Self {
        Self {
            structure,
            num_entries,
            comparisons: comparisons.get(),
            rotations: None,
            collisions: Some(collisions.get()),
            max_height: None,
            table_size: Some(table_size),
            load_factor: Some(num_entries as f32 / table_size as f32),
        }
    }
}
