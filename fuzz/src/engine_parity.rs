#![no_main]

//! Drives all four engines with the same operations and checks that they agree with each
//! other after every step.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use polydict::{Dictionary, DictionaryType, DynamicDictionary};

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { key: u8, val: u32 },
    Remove { key: u8 },
    Get { key: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut engines: Vec<DynamicDictionary<u8, u32>> = DictionaryType::ALL
        .iter()
        .map(|kind| DynamicDictionary::new(*kind))
        .collect();

    for op in &ops {
        match op {
            Op::Insert { key, val } => {
                let results: Vec<bool> = engines
                    .iter_mut()
                    .map(|d| d.insert(*key, *val).unwrap())
                    .collect();
                assert!(results.windows(2).all(|w| w[0] == w[1]), "{op:?}: {results:?}");
            }
            Op::Remove { key } => {
                let results: Vec<Option<u32>> =
                    engines.iter_mut().map(|d| d.remove(key)).collect();
                assert!(results.windows(2).all(|w| w[0] == w[1]), "{op:?}: {results:?}");
            }
            Op::Get { key } => {
                let results: Vec<Option<u32>> =
                    engines.iter().map(|d| d.at(key).ok().copied()).collect();
                assert!(results.windows(2).all(|w| w[0] == w[1]), "{op:?}: {results:?}");
            }
        }

        let lens: Vec<usize> = engines.iter().map(|d| d.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] == w[1]), "{op:?}: {lens:?}");
    }

    for d in &engines {
        let mut keys: Vec<u8> = d.iter().map(|(k, _)| *k).collect();
        if d.kind().is_tree() {
            assert!(keys.windows(2).all(|w| w[0] < w[1]), "{} out of order", d.kind());
        }
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), d.len());
    }
});
