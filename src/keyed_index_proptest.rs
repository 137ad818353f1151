#![cfg(test)]

// Property tests for KeyedIndex kept inside the crate so they can use the
// crate-private handle accessors.

use crate::keyed_index::{EntryId, InsertError, KeyedIndex};
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations shrink toward earlier keys and shorter runs.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    UniqueInsert(usize, i32),
    Remove(usize),
    Get(usize),
    Reset,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (1usize..=6, proptest::collection::vec("[a-z]{0,4}", 1..=24)).prop_flat_map(
        |(buckets, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::UniqueInsert(i, v)),
                2 => idx.clone().prop_map(Op::Remove),
                2 => idx.clone().prop_map(Op::Get),
                1 => Just(Op::Reset),
                1 => Just(Op::Iterate),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (buckets, pool.clone(), ops))
        },
    )
}

// Hasher that keeps only the low bits so chains get long.
#[derive(Clone, Default)]
struct NarrowBuildHasher;
struct NarrowHasher(u64);
impl BuildHasher for NarrowBuildHasher {
    type Hasher = NarrowHasher;
    fn build_hasher(&self) -> Self::Hasher {
        NarrowHasher(0)
    }
}
impl Hasher for NarrowHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = self.0.wrapping_mul(31).wrapping_add(*b as u64);
        }
    }
    fn finish(&self) -> u64 {
        self.0 & 0x7
    }
}

fn run_state_machine<S>(
    mut sut: KeyedIndex<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone + Default,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut handles: HashMap<String, EntryId> = HashMap::new();
    let mut buckets = sut.bucket_count();
    let mut resizes = 0usize;

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let prev = sut.insert(k.clone(), v);
                let want = model.insert(k.clone(), v);
                prop_assert_eq!(prev, want);
                if prev.is_none() {
                    if model.len() >= buckets {
                        buckets *= 2;
                        resizes += 1;
                    }
                    handles.insert(k.clone(), sut.find(&k).unwrap());
                }
            }
            Op::UniqueInsert(i, v) => {
                let k = pool[i].clone();
                match sut.unique_insert(k.clone(), v) {
                    Ok(h) => {
                        prop_assert!(!model.contains_key(&k));
                        model.insert(k.clone(), v);
                        if model.len() >= buckets {
                            buckets *= 2;
                            resizes += 1;
                        }
                        handles.insert(k, h);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(model.contains_key(&k));
                    }
                }
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let got = sut.remove(k.as_str());
                let want = model.remove(k).map(|v| (k.clone(), v));
                prop_assert_eq!(got, want);
                if let Some(h) = handles.remove(k) {
                    prop_assert!(h.value(&sut).is_none(), "removed handle must not resolve");
                }
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                prop_assert_eq!(sut.contains_key(k.as_str()), model.contains_key(k));
            }
            Op::Reset => {
                sut.reset();
                model.clear();
                handles.clear();
            }
            Op::Iterate => {
                let seen: BTreeSet<String> = sut.iter().map(|(_, k, _)| k.clone()).collect();
                let want: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(seen, want);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.bucket_count(), buckets);
        prop_assert_eq!(sut.resize_count(), resizes);
        prop_assert!(sut.len() < sut.bucket_count(), "load factor stays below 1.0");
        for (k, h) in &handles {
            prop_assert_eq!(h.key(&sut), Some(k), "handles survive growth");
            prop_assert_eq!(h.value(&sut), model.get(k));
        }
        let chained: usize = (0..sut.bucket_count()).map(|b| sut.chain_len(b)).sum();
        prop_assert_eq!(chained, model.len(), "every entry sits in exactly one chain");
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - Keys stay unique; insert overwrites and unique_insert refuses.
// - Growth happens exactly when a fresh insert reaches len == buckets and
//   doubles the bucket count.
// - Handles resolve to their entry across growth and die on removal.
// - Chains partition the entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((buckets, pool, ops) in arb_scenario()) {
        run_state_machine(KeyedIndex::with_capacity(buckets), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_long_chains((buckets, pool, ops) in arb_scenario()) {
        let sut = KeyedIndex::with_capacity_and_hasher(buckets, NarrowBuildHasher);
        run_state_machine(sut, &pool, ops)?;
    }

    #[test]
    fn prop_counts_match_model(keys in proptest::collection::vec(0u8..10, 0..100)) {
        let mut sut: KeyedIndex<u8, usize> = KeyedIndex::with_capacity(1);
        let mut model: HashMap<u8, usize> = HashMap::new();
        for k in keys {
            let c = model.entry(k).or_insert(0);
            *c += 1;
            prop_assert_eq!(sut.insert_count(k), *c);
        }
        for k in 0u8..10 {
            prop_assert_eq!(sut.get_count(&k), model.get(&k).copied().unwrap_or(0));
        }
    }
}
