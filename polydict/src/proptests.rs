use super::*;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    Update(u16, u32),
    Increment(u16),
    Clear,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // A narrow key range so that removals and duplicates actually hit.
    let key = 0u16..512;
    let op = prop_oneof![
        40 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        15 => key.clone().prop_map(Op::Get),
        10 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Update(k, v)),
        9 => key.clone().prop_map(Op::Increment),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=1500)
}

fn validate_hash_table<D: Dictionary<u16, u32>>(d: &D, load_factor: f32, max_load_factor: f32) {
    assert_eq!(d.iter().count(), d.len(), "iteration must visit every entry once");
    assert!(
        load_factor <= max_load_factor,
        "load factor {load_factor} above max {max_load_factor}"
    );
}

/// Applies `ops` to `d` and to a `BTreeMap`, checking every result against the model and
/// running `validate` after each mutation.
fn run_ops<D, F>(d: &mut D, ops: Vec<Op>, validate: F) -> Result<BTreeMap<u16, u32>, TestCaseError>
where
    D: Dictionary<u16, u32>,
    F: Fn(&D),
{
    let mut m: BTreeMap<u16, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let inserted = d.insert(key, value)?;
                prop_assert_eq!(inserted, !m.contains_key(&key));
                m.entry(key).or_insert(value);
            }
            Op::Remove(key) => {
                prop_assert_eq!(d.remove(&key), m.remove(&key));
            }
            Op::Get(key) => {
                prop_assert_eq!(d.at(&key).ok(), m.get(&key));
                prop_assert_eq!(d.contains(&key), m.contains_key(&key));
            }
            Op::Update(key, value) => {
                let res = d.update(&key, value);
                match m.get_mut(&key) {
                    Some(v) => {
                        prop_assert!(res.is_ok());
                        *v = value;
                    }
                    None => prop_assert_eq!(res, Err(DictError::KeyNotFound)),
                }
            }
            Op::Increment(key) => {
                let v = d.get_or_insert_default(key)?;
                *v = v.wrapping_add(1);
                let e = m.entry(key).or_default();
                *e = e.wrapping_add(1);
            }
            Op::Clear => {
                d.clear();
                m.clear();
            }
        }

        prop_assert_eq!(d.len(), m.len());
        prop_assert_eq!(d.is_empty(), m.is_empty());
        validate(&*d);
    }

    Ok(m)
}

fn sorted_entries<D: Dictionary<u16, u32>>(d: &D) -> Vec<(u16, u32)> {
    let mut entries: Vec<_> = d.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    entries
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_avl_equivalence(ops in ops_strategy()) {
        let mut t: AvlTree<u16, u32> = AvlTree::new();
        let m = run_ops(&mut t, ops, |t| crate::avl::tests::check_tree(t))?;
        // In-order iteration is already sorted.
        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_red_black_equivalence(ops in ops_strategy()) {
        let mut t: RedBlackTree<u16, u32> = RedBlackTree::new();
        let m = run_ops(&mut t, ops, |t| {
            crate::rbtree::tests::check_tree(t);
        })?;
        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_chained_equivalence(ops in ops_strategy(), size in 1usize..40, lf in 0.25f32..3.0) {
        let config = HashConfig::chained().with_table_size(size).with_max_load_factor(lf);
        let mut t: ChainedHashTable<u16, u32> = ChainedHashTable::with_config(config)?;
        let m = run_ops(&mut t, ops, |t| {
            validate_hash_table(t, t.load_factor(), t.max_load_factor());
            let total: usize = (0..t.bucket_count()).filter_map(|b| t.bucket_size(b).ok()).sum();
            assert_eq!(total, t.len(), "bucket sizes must add up to len");
        })?;
        prop_assert_eq!(sorted_entries(&t), m.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_open_equivalence(
        ops in ops_strategy(),
        // Quadratic probing is only guaranteed a free slot in prime-sized tables.
        size in prop::sample::select(vec![2usize, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]),
        lf in 0.1f32..0.5,
    ) {
        let config = HashConfig::open().with_table_size(size).with_max_load_factor(lf);
        let mut t: OpenHashTable<u16, u32> = OpenHashTable::with_config(config)?;
        let m = run_ops(&mut t, ops, |t| {
            validate_hash_table(t, t.load_factor(), t.max_load_factor());
            assert!(t.len() + t.tombstones() <= t.bucket_count());
        })?;
        prop_assert_eq!(sorted_entries(&t), m.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_engines_agree(entries in prop::collection::vec((0u16..256, any::<u32>()), 0..300)) {
        let mut reference: Option<Vec<(u16, u32)>> = None;
        for kind in DictionaryType::ALL {
            let d: DynamicDictionary<u16, u32> =
                DynamicDictionary::with_entries(kind, entries.iter().copied())?;
            let got = sorted_entries(&d);
            match &reference {
                Some(expected) => prop_assert_eq!(&got, expected),
                None => reference = Some(got),
            }
        }
    }

    #[test]
    fn prop_clone_is_independent(keys in prop::collection::btree_set(0u16..1000, 1..200)) {
        for kind in DictionaryType::ALL {
            let mut original: DynamicDictionary<u16, u32> =
                DynamicDictionary::with_entries(kind, keys.iter().map(|k| (*k, u32::from(*k))))?;
            let copy = original.clone();
            for k in &keys {
                original.remove(k);
            }
            prop_assert!(original.is_empty());
            prop_assert_eq!(copy.len(), keys.len());
            for k in &keys {
                prop_assert_eq!(copy.at(k), Ok(&u32::from(*k)));
            }
        }
    }
}
