use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;
use crate::{Linked, RbNode, State};

struct Rec {
    rb: RbNode,
    key: u32,
}

impl Linked for Rec {
    fn as_rb(&self) -> &RbNode {
        &self.rb
    }

    fn as_rb_mut(&mut self) -> &mut RbNode {
        &mut self.rb
    }
}

fn by_key(a: &Rec, b: &Rec) -> Ordering {
    a.key.cmp(&b.key)
}

fn new_rec(key: u32) -> Rec {
    Rec {
        rb: RbNode::new(),
        key,
    }
}

fn check_leftmost(root: &RbRootCached, recs: &Vec<Rec>) {
    assert_eq!(root.first(), root.iter(recs).next());
    assert_eq!(root.first(), root.as_root().first(recs));
    root.validate(recs, by_key).unwrap();
}

#[test]
fn test_empty() {
    let recs: Vec<Rec> = vec![];
    let root = RbRootCached::new();

    assert!(root.is_empty());
    assert_eq!(root.first(), None);
    assert_eq!(root.last(&recs), None);
    check_leftmost(&root, &recs);
}

#[test]
fn test_leftmost() {
    let mut recs: Vec<Rec> = [5, 3, 8, 1, 4, 7, 9, 2, 6, 0].iter().map(|k| new_rec(*k)).collect();
    let mut root = RbRootCached::new();

    let mut min = u32::MAX;
    for id in 0..recs.len() {
        root.insert(&mut recs, id, by_key).unwrap();
        min = min.min(recs[id].key);
        assert_eq!(root.first().map(|id| recs[id].key), Some(min));
        check_leftmost(&root, &recs);
    }

    // deleting the minimum moves the cache to the successor.
    for key in 0..10 {
        let id = root.first().unwrap();
        assert_eq!(recs[id].key, key);
        root.delete(&mut recs, id).unwrap();
        check_leftmost(&root, &recs);
    }
    assert!(root.is_empty());
    assert_eq!(root.first(), None);
}

#[test]
fn test_equal_minimum() {
    // equal keys go after existing ones, the first stays left-most.
    let mut recs: Vec<Rec> = [2, 2, 2].iter().map(|k| new_rec(*k)).collect();
    let mut root = RbRootCached::new();
    for id in 0..recs.len() {
        root.insert(&mut recs, id, by_key).unwrap();
    }
    assert_eq!(root.first(), Some(0));
    check_leftmost(&root, &recs);
}

#[test]
fn test_find_slot() {
    let mut recs: Vec<Rec> = [5, 3, 8, 1].iter().map(|k| new_rec(*k)).collect();
    let mut root = RbRootCached::new();
    for id in 0..recs.len() {
        let (slot, leftmost) = root.find_slot(&recs, id, by_key);
        assert_eq!(leftmost, id != 2, "id {}", id);
        root.link(&mut recs, slot, id, leftmost).unwrap();
        check_leftmost(&root, &recs);
    }
}

#[test]
fn test_replace() {
    let mut recs: Vec<Rec> = [5, 3, 8, 3].iter().map(|k| new_rec(*k)).collect();
    let mut root = RbRootCached::new();
    for id in 0..3 {
        root.insert(&mut recs, id, by_key).unwrap();
    }
    assert_eq!(root.first(), Some(1));

    root.replace(&mut recs, 1, 3).unwrap();
    assert_eq!(root.first(), Some(3));
    assert_eq!(recs[1].rb.state(), State::Removed);
    check_leftmost(&root, &recs);
}

#[test]
fn test_clear() {
    let mut recs: Vec<Rec> = (0..32).map(new_rec).collect();
    let mut root = RbRootCached::new();
    for id in 0..recs.len() {
        root.insert(&mut recs, id, by_key).unwrap();
    }
    assert_eq!(root.clear(&mut recs), 32);
    assert_eq!(root.first(), None);
    check_leftmost(&root, &recs);
}

#[test]
fn test_cursor() {
    let mut recs: Vec<Rec> = (0..20).rev().map(new_rec).collect();
    let mut root = RbRootCached::new();
    for id in 0..recs.len() {
        root.insert(&mut recs, id, by_key).unwrap();
    }

    let mut keys = vec![];
    let mut cursor = root.cursor(&recs, Order::Ascending);
    while let Some(id) = cursor.next(&recs) {
        keys.push(recs[id].key);
        root.delete(&mut recs, id).unwrap();
        check_leftmost(&root, &recs);
    }
    assert_eq!(keys, (0..20).collect::<Vec<u32>>());
    assert!(root.is_empty());
}

#[test]
fn test_cached() {
    let seed: u64 = random();
    println!("test_cached {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut recs: Vec<Rec> = (0..100).map(|_| new_rec(rng.gen::<u32>() % 1000)).collect();
    let mut root = RbRootCached::new();
    for id in 0..recs.len() {
        root.insert(&mut recs, id, by_key).unwrap();
    }
    check_leftmost(&root, &recs);

    let mut linked: Vec<usize> = (0..recs.len()).collect();
    let (mut n_inserts, mut n_deletes) = (0, 0);
    for _i in 0..10_000 {
        if rng.gen::<bool>() || linked.is_empty() {
            n_inserts += 1;
            let id = recs.len();
            recs.push(new_rec(rng.gen::<u32>() % 1000));
            root.insert(&mut recs, id, by_key).unwrap();
            linked.push(id);
        } else {
            n_deletes += 1;
            // bias towards the minimum, to exercise the cache.
            let id = if rng.gen::<u8>() % 4 == 0 {
                root.first().unwrap()
            } else {
                linked[rng.gen::<usize>() % linked.len()]
            };
            linked.retain(|x| *x != id);
            root.delete(&mut recs, id).unwrap();
        }

        let min = linked.iter().map(|id| recs[*id].key).min();
        assert_eq!(root.first().map(|id| recs[id].key), min);
        assert_eq!(root.first(), root.as_root().first(&recs));
    }

    check_leftmost(&root, &recs);
    println!("inserts:{} deletes:{} len:{}", n_inserts, n_deletes, linked.len());
}
