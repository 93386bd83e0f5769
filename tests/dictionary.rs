//! Behavioural tests for the public dictionary API.
//!
//! Run with: cargo test --test dictionary

use std::{collections::BTreeMap, rc::Rc};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use splay_dict::{comparator, Dictionary, DictionaryBuilder, Error, Registry};

fn keys_of<V>(dict: &Dictionary<u32, V>) -> Vec<u32> {
    dict.keys().copied().collect()
}

#[test]
fn insert_iterate_delete_rank() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "round-trip", comparator::natural);

    for key in [5, 3, 8, 1, 4].iter() {
        dict.add(*key, ());
    }
    assert_eq!(keys_of(&dict), vec![1, 3, 4, 5, 8]);

    assert_eq!(dict.delete(&3), Some(()));
    assert_eq!(keys_of(&dict), vec![1, 4, 5, 8]);

    assert_eq!(dict.linear_index(&8), Some(3));
}

#[test]
fn delete_then_reinsert() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "reinsert", comparator::natural);

    for key in 0..10u32 {
        dict.add(key, key);
    }

    assert_eq!(dict.delete(&4), Some(4));
    assert!(dict.find(&4).is_none());
    assert_eq!(dict.retrieve(&4), None);
    assert_eq!(dict.linear_index(&4), None);

    assert!(dict.try_add(4, 40).is_ok());
    assert_eq!(dict.retrieve(&4), Some(&40));
    assert_eq!(dict.linear_index(&4), Some(4));
    assert_eq!(dict.size(), 10);
    assert_eq!(keys_of(&dict), (0..10).collect::<Vec<_>>());
}

#[test]
fn duplicate_insert_contract() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "dupes", comparator::natural);

    dict.add(1u32, "one");
    dict.add(2u32, "two");

    // `add` merges into the existing element.
    dict.add(1, "uno");
    assert_eq!(dict.size(), 2);
    assert_eq!(dict.retrieve(&1), Some(&"uno"));

    // `insert` does the same but returns what it displaced.
    assert_eq!(dict.insert(2, "dos"), Some("two"));
    assert_eq!(dict.insert(3, "tres"), None);

    // `try_add` keeps the strict no-duplicates precondition.
    assert_eq!(
        dict.try_add(3, "three").map(|e| *e.value()),
        Err(Error::DuplicateKey("dupes".to_string()))
    );
    assert_eq!(dict.retrieve(&3), Some(&"tres"));
    assert_eq!(keys_of(&dict), vec![1, 2, 3]);
}

#[test]
fn random_operations_match_btreemap() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "model", comparator::natural);
    let mut model = BTreeMap::new();

    let mut rng = StdRng::seed_from_u64(0x5eed);

    for step in 0..5_000u32 {
        let key = rng.gen_range(0..500u32);

        match rng.gen_range(0..4) {
            0 | 1 => {
                assert_eq!(dict.insert(key, step), model.insert(key, step));
            }
            2 => {
                assert_eq!(dict.delete(&key), model.remove(&key));
            }
            _ => {
                assert_eq!(dict.retrieve(&key), model.get(&key));
            }
        }

        assert_eq!(dict.size(), model.len());

        if step % 250 == 0 {
            let expected: Vec<_> = model.iter().map(|(k, v)| (*k, *v)).collect();
            let actual: Vec<_> = dict.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(actual, expected);

            for (rank, key) in model.keys().enumerate() {
                assert_eq!(dict.linear_index(key), Some(rank));
            }
        }
    }

    for (key, value) in &model {
        assert_eq!(dict.find(key).map(|e| *e.value()), Some(*value));
    }
}

#[test]
fn iteration_is_strictly_ascending_under_churn() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "churn", comparator::natural);
    let mut rng = StdRng::seed_from_u64(7);

    let mut keys: Vec<u32> = (0..1_000).collect();
    keys.shuffle(&mut rng);

    for (i, key) in keys.iter().enumerate() {
        dict.add(*key, ());

        if i % 3 == 0 {
            let victim = keys[rng.gen_range(0..=i)];
            dict.delete(&victim);
        }

        if i % 100 == 0 {
            let listed = keys_of(&dict);
            assert!(listed.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(listed.len(), dict.size());
        }
    }
}

#[test]
fn linear_index_dirty_then_cached() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "ranks", comparator::natural);

    for key in (0..100u32).rev() {
        dict.add(key * 2, ());
    }

    // Dirty path: first read after the inserts.
    assert_eq!(dict.linear_index(&50), Some(25));

    // Cached path: an unrelated find in between must not disturb ranks.
    dict.find(&198);
    assert_eq!(dict.linear_index(&50), Some(25));
    assert_eq!(dict.linear_index(&0), Some(0));
    assert_eq!(dict.linear_index(&198), Some(99));
    assert_eq!(dict.linear_index(&51), None);

    dict.delete(&0);
    assert_eq!(dict.linear_index(&50), Some(24));
    dict.find(&100);
    assert_eq!(dict.linear_index(&198), Some(98));
}

#[test]
fn foreach_deleting_current_visits_every_survivor_once() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "foreach", comparator::natural);

    for key in 0..50u32 {
        dict.add(key, key);
    }

    let mut visited = Vec::new();
    dict.foreach(|dict, handle| {
        let key = *dict.key(handle).unwrap();
        visited.push(key);

        if key % 3 == 0 {
            assert_eq!(dict.delete(&key), Some(key));
        }
    });

    assert_eq!(visited, (0..50).collect::<Vec<_>>());
    assert_eq!(
        keys_of(&dict),
        (0..50).filter(|k| k % 3 != 0).collect::<Vec<_>>()
    );
}

#[test]
fn foreach_deleting_behind_is_safe() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "behind", comparator::natural);

    for key in 0..10u32 {
        dict.add(key, ());
    }

    let mut visited = Vec::new();
    dict.foreach(|dict, handle| {
        let key = *dict.key(handle).unwrap();
        visited.push(key);

        if key > 0 {
            dict.delete(&(key - 1));
        }
    });

    assert_eq!(visited, (0..10).collect::<Vec<_>>());
    assert_eq!(keys_of(&dict), vec![9]);
}

#[test]
fn search_finds_first_match() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "search", comparator::natural);

    for key in [10u32, 40, 20, 30].iter() {
        dict.add(*key, key.to_string());
    }

    let found = dict.search(|dict, handle| {
        dict.value(handle)
            .filter(|v| v.starts_with('3') || v.starts_with('4'))
            .cloned()
    });
    assert_eq!(found.as_deref(), Some("30"));
}

#[test]
fn cursor_interleaved_with_mutation() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "cursor", comparator::natural);

    for key in (10..=50u32).step_by(10) {
        dict.add(key, key);
    }

    let mut cursor = dict.cursor();
    let mut seen = Vec::new();

    while let Some(key) = cursor.current(&dict).copied() {
        seen.push(key);

        // Mutations behind the cursor do not disturb it.
        dict.add(key - 5, 0);
        dict.delete(&(key - 10));

        cursor.advance(&dict).unwrap();
    }

    assert_eq!(seen, vec![10, 20, 30, 40, 50]);
    assert_eq!(keys_of(&dict), vec![5, 15, 25, 35, 45, 50]);
    assert_eq!(
        cursor.advance(&dict),
        Err(Error::CursorExhausted("cursor".to_string()))
    );
}

#[test]
fn stats_of_empty_and_single() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "shape", comparator::natural);

    let empty = dict.statistics();
    assert_eq!(
        (empty.count(), empty.depth_sum(), empty.max_depth()),
        (0, 0, 0)
    );

    dict.add(1u32, ());
    let single = dict.statistics();
    assert_eq!(
        (single.count(), single.depth_sum(), single.max_depth()),
        (1, 0, 0)
    );

    let mut lines = Vec::new();
    dict.stats(|line| lines.push(line.to_string()));
    assert_eq!(lines, vec![single.to_string()]);
    assert!(lines[0].starts_with("shape "));
}

#[test]
fn stats_track_splaying() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "chain", comparator::natural);

    for key in 0..100u32 {
        dict.add(key, ());
    }

    // Ascending inserts build a chain hanging off the newest key.
    let chain = dict.statistics();
    assert_eq!(chain.max_depth(), 99);
    assert_eq!(chain.depth_sum(), (0..100).sum::<usize>());

    // Splaying the deepest key roughly halves the chain.
    dict.find(&0);
    let splayed = dict.statistics();
    assert_eq!(splayed.count(), 100);
    assert!(splayed.max_depth() < chain.max_depth());
    assert!(splayed.depth_sum() < chain.depth_sum());
}

#[test]
fn destroy_calls_release_once_per_element_in_order() {
    let registry = Registry::new();
    let mut dict = Dictionary::new(&registry, "teardown", comparator::natural);

    let mut keys: Vec<u32> = (0..64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(3));
    for key in &keys {
        dict.add(*key, Rc::new(*key));
    }

    let mut released = Vec::new();
    dict.destroy(|key, value| {
        assert_eq!(key, *value);
        released.push(key);
    });

    assert_eq!(released, (0..64).collect::<Vec<_>>());
    assert!(registry.is_empty());
}

#[test]
fn registry_walk_covers_live_dictionaries() {
    let registry = Registry::new();

    let mut users = Dictionary::new(&registry, "users", comparator::rfc1459_case_insensitive);
    users.add("Nick[1]".to_string(), ());
    users.add("nick{2}".to_string(), ());
    users.add("NICK{1}".to_string(), ());

    let channels: Dictionary<String, ()> = DictionaryBuilder::new(comparator::ascii_case_insensitive)
        .name("channels")
        .build(&registry);

    let mut lines = Vec::new();
    registry.stats_walk(|line| lines.push(line.to_string()));

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("users "));
    assert_eq!(lines[0].split_whitespace().nth(2), Some("2"));
    assert!(lines[1].starts_with("channels "));

    drop(channels);
    assert_eq!(registry.names(), vec!["users"]);
    assert_eq!(registry.statistics()[0].count(), 2);
}
