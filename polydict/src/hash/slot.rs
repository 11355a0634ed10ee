/// One position of an open-addressing table.
///
/// `Deleted` is a tombstone: the position is free for a later insertion, but a probe looking
/// for a key has to continue past it, since the key may have been placed further along the
/// sequence while this slot was still occupied.
#[derive(Clone, Debug, Default)]
pub(crate) enum Slot<K, V> {
    #[default]
    Empty,
    Active(K, V),
    Deleted,
}

impl<K, V> Slot<K, V> {
    pub(crate) fn is_active(&self) -> bool {
        matches!(self, Slot::Active(..))
    }

    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Active(k, v) => Some((k, v)),
            _ => None,
        }
    }

    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Active(k, v) => Some((k, v)),
            _ => None,
        }
    }
}
