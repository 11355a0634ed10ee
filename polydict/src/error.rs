use thiserror::Error;

/// Errors surfaced by the dictionary engines.
///
/// Inserting an existing key, removing an absent key and `contains` are never errors; only
/// the conditions below are.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// `at`, `at_mut` or `update` was asked for a key that is not stored.
    #[error("key not found")]
    KeyNotFound,

    /// A caller supplied a value the dictionary cannot work with: an unknown engine name, a
    /// non-positive max load factor, a zero table size or a bucket index out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An open-addressing probe sequence visited every position without finding an empty or
    /// deleted slot.
    #[error("probe sequence exhausted in a table of {table_size} slots")]
    Exhausted { table_size: usize },
}

impl DictError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DictError::InvalidArgument(msg.into())
    }
}
