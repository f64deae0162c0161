use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng, XorShiftRng};
use sentinel_rbtree::red_black_tree::RedBlackTree;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1_000;

fn keys() -> Vec<u64> {
    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u64()).collect()
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in &keys {
                set.insert(*key);
            }
        })
    });
}

fn bench_insert(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("bench red_black_tree insert", move |b| {
        b.iter(|| {
            let mut tree = RedBlackTree::new();
            for key in &keys {
                tree.insert_node(*key);
            }
        })
    });
}

fn bench_find(c: &mut Criterion) {
    let keys = keys();
    let mut tree = RedBlackTree::new();
    for key in &keys {
        tree.insert_node(*key);
    }

    c.bench_function("bench red_black_tree find", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.find_node(*key));
            }
        })
    });
}

fn bench_insert_delete(c: &mut Criterion) {
    let keys = keys();
    c.bench_function("bench red_black_tree insert delete", move |b| {
        b.iter(|| {
            let mut tree = RedBlackTree::with_capacity(NUM_OF_OPERATIONS);
            for key in &keys {
                tree.insert_node(*key);
            }
            for key in &keys {
                tree.delete_node(*key);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_btreeset_insert,
    bench_insert,
    bench_find,
    bench_insert_delete,
);
criterion_main!(benches);
