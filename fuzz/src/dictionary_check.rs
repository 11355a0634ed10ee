#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use polydict::{Dictionary, DictionaryType, DynamicDictionary};

#[derive(Arbitrary, Debug)]
enum Engine {
    Avl,
    RedBlack,
    ChainedHash,
    OpenHash,
}

impl From<Engine> for DictionaryType {
    fn from(e: Engine) -> Self {
        match e {
            Engine::Avl => DictionaryType::Avl,
            Engine::RedBlack => DictionaryType::RedBlack,
            Engine::ChainedHash => DictionaryType::ChainedHash,
            Engine::OpenHash => DictionaryType::OpenHash,
        }
    }
}

#[derive(Arbitrary, Debug)]
enum MapMethod {
    Get { key: u16 },
    Insert { key: u16, val: usize },
    Update { key: u16, val: usize },
    Increment { key: u16 },
    Delete { key: u16 },
    Clear,
}

#[derive(Arbitrary, Debug)]
struct Input {
    engine: Engine,
    methods: Vec<MapMethod>,
}

fuzz_target!(|input: Input| {
    let kind = DictionaryType::from(input.engine);
    let mut dict = DynamicDictionary::<u16, usize>::new(kind);
    let mut bt_map = BTreeMap::<u16, usize>::new();

    for m in &input.methods {
        match m {
            MapMethod::Get { key } => {
                assert_eq!(dict.at(key).ok(), bt_map.get(key));
                assert_eq!(dict.contains(key), bt_map.contains_key(key));
            }
            MapMethod::Insert { key, val } => {
                let inserted = dict.insert(*key, *val).unwrap();
                assert_eq!(inserted, !bt_map.contains_key(key));
                bt_map.entry(*key).or_insert(*val);
            }
            MapMethod::Update { key, val } => {
                let res = dict.update(key, *val);
                match bt_map.get_mut(key) {
                    Some(v) => {
                        assert!(res.is_ok());
                        *v = *val;
                    }
                    None => assert!(res.is_err()),
                }
            }
            MapMethod::Increment { key } => {
                let v = dict.get_or_insert_default(*key).unwrap();
                *v = v.wrapping_add(1);
                let e = bt_map.entry(*key).or_default();
                *e = e.wrapping_add(1);
            }
            MapMethod::Delete { key } => {
                assert_eq!(dict.remove(key), bt_map.remove(key));
            }
            MapMethod::Clear => {
                dict.clear();
                bt_map.clear();
            }
        }
        assert_eq!(dict.len(), bt_map.len());
    }

    let mut entries: Vec<(u16, usize)> = dict.iter().map(|(k, v)| (*k, *v)).collect();
    if !kind.is_tree() {
        entries.sort_unstable();
    }
    let expected: Vec<(u16, usize)> = bt_map.into_iter().collect();
    assert_eq!(entries, expected, "{kind} diverged from the model");
});
