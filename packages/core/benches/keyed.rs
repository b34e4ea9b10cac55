//! The classic table benchmark: build, diff and patch large keyed tables.
//!
//! Patches are applied to the in-memory display tree, so the numbers cover the diff engine and patch resolution but
//! not the cost of a real browser.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::prelude::*;
use trellis_core::{apply, diff, prelude::*, render, Str};
use trellis_memory::MemoryDom;

criterion_group!(mbenches, create_rows, swap_rows, update_every_tenth, shuffle_rows);
criterion_main!(mbenches);

const ADJECTIVES: &[&str] = &[
    "pretty", "large", "big", "small", "tall", "short", "long", "handsome", "plain",
];
const COLOURS: &[&str] = &[
    "red", "yellow", "blue", "green", "pink", "brown", "purple", "white", "black",
];
const NOUNS: &[&str] = &[
    "table", "chair", "house", "bbq", "desk", "car", "pony", "cookie", "sandwich",
];

#[derive(Clone)]
struct Row {
    id: usize,
    label: String,
}

fn rows(count: usize, rng: &mut StdRng) -> Vec<Row> {
    (0..count)
        .map(|id| Row {
            id,
            label: format!(
                "{} {} {}",
                ADJECTIVES.choose(rng).unwrap(),
                COLOURS.choose(rng).unwrap(),
                NOUNS.choose(rng).unwrap()
            ),
        })
        .collect()
}

fn table(rows: &[Row]) -> VNode {
    VNode::keyed(
        "tbody",
        [],
        rows.iter().map(|row| {
            let tr = VNode::element(
                "tr",
                [],
                [
                    VNode::element(
                        "td",
                        [Directive::class("col-md-1")],
                        [VNode::text(row.id.to_string())],
                    ),
                    VNode::element(
                        "td",
                        [Directive::class("col-md-4")],
                        [VNode::element(
                            "a",
                            [Directive::on("click", Handler::always(row.id))],
                            [VNode::text(row.label.clone())],
                        )],
                    ),
                    VNode::element("td", [Directive::class("col-md-6")], []),
                ],
            );
            (Str::from(row.id.to_string()), tr)
        }),
    )
}

/// Time diffing `before` against `after` and applying the patches to a freshly rendered `before`.
fn bench_update(c: &mut Criterion, name: &str, before: Vec<Row>, after: Vec<Row>) {
    let (old, new) = (table(&before), table(&after));
    let events = EventRoot::discard();

    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                let mut dom = MemoryDom::new();
                let root = render(&mut dom, &old, &events).unwrap();
                (dom, root)
            },
            |(mut dom, root)| {
                let patches = diff(&old, &new);
                apply(&mut dom, &root, &old, patches, &events).unwrap()
            },
            BatchSize::LargeInput,
        )
    });
}

fn create_rows(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let data = rows(1_000, &mut rng);
    let events = EventRoot::discard();

    c.bench_function("create 1k rows", |b| {
        b.iter(|| {
            let mut dom = MemoryDom::new();
            render(&mut dom, &table(&data), &events).unwrap()
        })
    });
}

fn swap_rows(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let before = rows(1_000, &mut rng);
    let mut after = before.clone();
    after.swap(1, 998);
    bench_update(c, "swap two rows", before, after);
}

fn update_every_tenth(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let before = rows(1_000, &mut rng);
    let mut after = before.clone();
    for row in after.iter_mut().step_by(10) {
        row.label.push_str(" !!!");
    }
    bench_update(c, "update every 10th row", before, after);
}

fn shuffle_rows(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let before = rows(1_000, &mut rng);
    let mut after = before.clone();
    after.shuffle(&mut rng);
    bench_update(c, "shuffle all rows", before, after);
}
