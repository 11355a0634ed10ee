//! Hash table engines and their shared sizing rules.
//!
//! Both tables are prime-sized and only ever grow. An insertion first makes room: if storing
//! one more entry would push `len / table_size` above the max load factor, the table is
//! rebuilt at (the next prime after) twice its size, repeatedly if needed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use crate::error::DictError;
use crate::utils::primes::next_prime;

pub mod chained;
pub mod open;
mod slot;

/// Hasher used unless another is supplied. It is unseeded, so bucket placement and therefore
/// the collision counters are the same from run to run.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Construction parameters for the hash engines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashConfig {
    /// Number of buckets (chained) or slots (open addressing) to start with. The chained table
    /// uses it as given; the open table rounds it up to a prime, since quadratic probing only
    /// reaches enough slots in a prime-sized table. Growth always rounds to primes.
    pub initial_table_size: usize,
    pub max_load_factor: f32,
}

impl HashConfig {
    pub const DEFAULT_TABLE_SIZE: usize = 19;

    pub fn chained() -> Self {
        Self {
            initial_table_size: Self::DEFAULT_TABLE_SIZE,
            max_load_factor: 1.0,
        }
    }

    pub fn open() -> Self {
        Self {
            initial_table_size: Self::DEFAULT_TABLE_SIZE,
            max_load_factor: 0.5,
        }
    }

    pub fn with_table_size(mut self, initial_table_size: usize) -> Self {
        self.initial_table_size = initial_table_size;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f32) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), DictError> {
        if self.initial_table_size == 0 {
            return Err(DictError::invalid("table size must be at least 1"));
        }
        check_load_factor(self.max_load_factor)
    }
}

/// Smallest accepted max load factor. Lower values would ask for tables more than a hundred
/// times larger than their contents, and eventually for sizes that do not fit in a `usize`.
pub const MIN_LOAD_FACTOR: f32 = 0.01;

pub(crate) fn check_load_factor(lf: f32) -> Result<(), DictError> {
    if !lf.is_finite() || lf < MIN_LOAD_FACTOR {
        return Err(DictError::invalid(format!(
            "max load factor must be a finite number of at least {MIN_LOAD_FACTOR}, got {lf}"
        )));
    }
    Ok(())
}

/// Home position of `key` in a table of `table_size` positions.
#[inline]
pub(crate) fn home_of<K, S>(hash_builder: &S, key: &K, table_size: usize) -> usize
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    (hash_builder.hash_one(key) % table_size as u64) as usize
}

/// The size to grow to before storing entry number `len + 1`, or `None` if it already fits.
pub(crate) fn size_for_insert(len: usize, table_size: usize, max_load_factor: f32) -> Option<usize> {
    let mut size = table_size;
    while (len + 1) as f32 / size as f32 > max_load_factor {
        size = next_prime(size.saturating_mul(2));
    }
    (size > table_size).then_some(size)
}

/// The size `reserve(n)` asks for, or `None` when `n` entries already fit.
pub(crate) fn size_for_reserve(n: usize, table_size: usize, max_load_factor: f32) -> Option<usize> {
    if n as f32 > table_size as f32 * max_load_factor {
        Some((n as f32 / max_load_factor).ceil() as usize)
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(HashConfig::chained().initial_table_size, 19);
        assert_eq!(HashConfig::chained().max_load_factor, 1.0);
        assert_eq!(HashConfig::open().max_load_factor, 0.5);
        assert!(HashConfig::open().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        for lf in [0.0, -1.0, 1e-20, 0.009, f32::NAN, f32::INFINITY] {
            let config = HashConfig::chained().with_max_load_factor(lf);
            assert!(matches!(config.validate(), Err(DictError::InvalidArgument(_))));
        }
        let config = HashConfig::open().with_table_size(0);
        assert!(matches!(config.validate(), Err(DictError::InvalidArgument(_))));
        assert!(HashConfig::open().with_max_load_factor(MIN_LOAD_FACTOR).validate().is_ok());
    }

    #[test]
    fn test_size_for_insert_at_smallest_load_factor() {
        // Stays far from overflow: 1000 entries need no more than 100_000 slots.
        let size = size_for_insert(999, 19, MIN_LOAD_FACTOR).unwrap();
        assert!(size >= 100_000);
        assert!(size < 400_000);
    }

    #[test]
    fn test_size_for_insert() {
        // Second entry in two buckets at 0.75 goes over; doubling gives 4, rounded to 5.
        assert_eq!(size_for_insert(0, 2, 0.75), None);
        assert_eq!(size_for_insert(1, 2, 0.75), Some(5));
        // At 1.0 growth happens once the table is full.
        assert_eq!(size_for_insert(18, 19, 1.0), None);
        assert_eq!(size_for_insert(19, 19, 1.0), Some(41));
        // Several doublings at once when the load factor is tiny.
        assert_eq!(size_for_insert(0, 3, 0.1), Some(17));
    }

    #[test]
    fn test_size_for_reserve() {
        assert_eq!(size_for_reserve(19, 19, 1.0), None);
        assert_eq!(size_for_reserve(20, 19, 1.0), Some(20));
        assert_eq!(size_for_reserve(10, 19, 0.5), Some(20));
        assert_eq!(size_for_reserve(9, 19, 0.5), None);
    }

    #[test]
    fn test_identity_hasher_homes() {
        let s = test_hasher::IdentityBuildHasher::default();
        assert_eq!(home_of(&s, &22i32, 11), 0);
        assert_eq!(home_of(&s, &7u64, 5), 2);
    }
}
