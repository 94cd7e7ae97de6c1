use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;
use crate::{Linked, RbNode, RbRoot, State};

use std::cmp::Ordering;

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

fn make_tree(keys: &[u32]) -> (RbRoot, Vec<Rec>) {
    let mut recs: Vec<Rec> = keys
        .iter()
        .map(|key| Rec {
            rb: RbNode::new(),
            key: *key,
        })
        .collect();
    let mut root = RbRoot::new();
    for id in 0..recs.len() {
        root.insert(&mut recs, id, by_key).unwrap();
    }
    (root, recs)
}

fn random_keys(rng: &mut SmallRng, n: usize) -> Vec<u32> {
    (0..n).map(|_| rng.gen::<u32>() % 10_000).collect()
}

#[test]
fn test_ascending() {
    let (root, recs) = make_tree(&[5, 3, 8, 1, 4, 7, 9, 2, 6, 0]);

    let keys: Vec<u32> = root.iter(&recs).map(|id| recs[id].key).collect();
    assert_eq!(keys, (0..10).collect::<Vec<u32>>());

    let keys: Vec<u32> = Iter::new(&recs, root.root(), Order::Descending)
        .map(|id| recs[id].key)
        .collect();
    assert_eq!(keys, (0..10).rev().collect::<Vec<u32>>());

    // step by step navigation agrees with the iterator.
    let mut node = first(&recs, root.root());
    for key in 0..10 {
        let id = node.unwrap();
        assert_eq!(recs[id].key, key);
        node = next(&recs, id);
    }
    assert_eq!(node, None);

    let mut node = last(&recs, root.root());
    for key in (0..10).rev() {
        let id = node.unwrap();
        assert_eq!(recs[id].key, key);
        node = prev(&recs, id);
    }
    assert_eq!(node, None);
}

#[test]
fn test_from_and_after() {
    let (root, recs) = make_tree(&[5, 3, 8, 1, 4, 7, 9, 2, 6, 0]);
    let four = root.find(&recs, &4, |rec, key| rec.key.cmp(key)).unwrap();

    let keys: Vec<u32> = Iter::from_node(&recs, four, Order::Ascending)
        .map(|id| recs[id].key)
        .collect();
    assert_eq!(keys, vec![4, 5, 6, 7, 8, 9]);

    let keys: Vec<u32> = Iter::after_node(&recs, four, Order::Ascending)
        .map(|id| recs[id].key)
        .collect();
    assert_eq!(keys, vec![5, 6, 7, 8, 9]);

    let keys: Vec<u32> = Iter::from_node(&recs, four, Order::Descending)
        .map(|id| recs[id].key)
        .collect();
    assert_eq!(keys, vec![4, 3, 2, 1, 0]);

    let keys: Vec<u32> = Iter::after_node(&recs, four, Order::Descending)
        .map(|id| recs[id].key)
        .collect();
    assert_eq!(keys, vec![3, 2, 1, 0]);

    // resume a walk that was abandoned half way.
    let mut iter = root.iter(&recs);
    let mut node = None;
    for _ in 0..3 {
        node = iter.next();
    }
    let rest: Vec<u32> = Iter::after_node(&recs, node.unwrap(), Order::Ascending)
        .map(|id| recs[id].key)
        .collect();
    let tail: Vec<u32> = iter.map(|id| recs[id].key).collect();
    assert_eq!(rest, tail);

    let mut cursor = Cursor::after_node(&recs, four, Order::Ascending);
    assert_eq!(cursor.peek().map(|id| recs[id].key), Some(5));
    cursor.next(&recs);
    assert_eq!(cursor.peek().map(|id| recs[id].key), Some(6));
    let mut cursor = Cursor::from_node(four, Order::Ascending);
    assert_eq!(cursor.next(&recs), Some(four));
}

#[test]
fn test_post_order() {
    let seed: u64 = random();
    println!("test_post_order {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let keys = random_keys(&mut rng, 1000);
    let (root, recs) = make_tree(&keys);

    let mut visited = vec![false; recs.len()];
    let mut n = 0;
    for id in root.post_order(&recs) {
        for child in [recs[id].rb.left(), recs[id].rb.right()].iter() {
            if let Some(child) = child {
                assert!(visited[*child], "child {} after parent {}", child, id);
            }
        }
        assert!(!visited[id]);
        visited[id] = true;
        n += 1;
    }
    assert_eq!(n, recs.len());
    assert_eq!(post_first(&recs, root.root()).map(|id| recs[id].rb.left()), Some(None));
}

#[test]
fn test_pre_order() {
    let seed: u64 = random();
    println!("test_pre_order {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let keys = random_keys(&mut rng, 1000);
    let (root, recs) = make_tree(&keys);

    let mut visited = vec![false; recs.len()];
    let mut n = 0;
    for id in root.pre_order(&recs) {
        if let Some(parent) = recs[id].rb.parent() {
            assert!(visited[parent], "parent {} after child {}", parent, id);
        }
        assert!(!visited[id]);
        visited[id] = true;
        n += 1;
    }
    assert_eq!(n, recs.len());
    assert_eq!(root.pre_order(&recs).next(), root.root());
}

#[test]
fn test_cursor_delete() {
    let seed: u64 = random();
    println!("test_cursor_delete {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let keys = random_keys(&mut rng, 500);
    let (mut root, mut recs) = make_tree(&keys);

    // delete every other node while walking.
    let mut seen = vec![];
    let mut cursor = root.cursor(&recs, Order::Ascending);
    let mut toggle = false;
    while let Some(id) = cursor.next(&recs) {
        seen.push(recs[id].key);
        if toggle {
            root.delete(&mut recs, id).unwrap();
        }
        toggle = !toggle;
    }
    let mut refs = keys.clone();
    refs.sort();
    assert_eq!(seen, refs);
    root.validate(&recs, by_key).unwrap();

    // and the rest, walking backwards.
    let mut cursor = root.cursor(&recs, Order::Descending);
    let mut prev_key = u32::MAX;
    while let Some(id) = cursor.next(&recs) {
        assert!(recs[id].key <= prev_key);
        prev_key = recs[id].key;
        root.delete(&mut recs, id).unwrap();
    }
    assert!(root.is_empty());
    assert!(recs.iter().all(|rec| rec.rb.state() == State::Removed));
}

#[test]
fn test_post_order_delete() {
    let seed: u64 = random();
    println!("test_post_order_delete {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let keys = random_keys(&mut rng, 500);
    let (mut root, mut recs) = make_tree(&keys);

    // rotations may reshape the tree under the walk, so keep
    // walking until nothing is left.
    let mut rounds = 0;
    while !root.is_empty() {
        rounds += 1;
        let mut cursor = root.cursor(&recs, Order::PostOrder);
        while let Some(id) = cursor.next(&recs) {
            if recs[id].rb.is_linked() {
                root.delete(&mut recs, id).unwrap();
            }
        }
        root.validate(&recs, by_key).unwrap();
        assert!(rounds <= recs.len());
    }

    assert_eq!(root.root(), None);
    assert!(recs.iter().all(|rec| rec.rb.state() == State::Removed));
}
