//! Benchmarks for navigation tree loading and traversal.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use navtree_core::{NavigationTree, SourceId, TreeSource};

/// Create a source with the specified depth and breadth.
fn create_source(depth: usize, breadth: usize) -> TreeSource {
    fn create_level(
        source: &mut TreeSource,
        parent: SourceId,
        current_depth: usize,
        max_depth: usize,
        breadth: usize,
    ) {
        if current_depth >= max_depth {
            return;
        }
        for i in 0..breadth {
            let child = source.add_node(
                format!("Section {current_depth}.{i}"),
                Some(&format!("section_{current_depth}_{i}.html")),
            );
            source.push_child(parent, child);
            create_level(source, child, current_depth + 1, max_depth, breadth);
        }
    }

    let mut source = TreeSource::new();
    let root = source.add_node("Manual", Some("index.html"));
    source.push_root(root);
    create_level(&mut source, root, 0, depth, breadth);
    source
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for (depth, breadth) in [(3, 5), (4, 6), (6, 4)] {
        let source = create_source(depth, breadth);
        group.bench_with_input(
            BenchmarkId::new("load", format!("{depth}x{breadth}")),
            &source,
            |b, source| b.iter(|| NavigationTree::load(source).unwrap()),
        );
    }

    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let tree = NavigationTree::load(&create_source(5, 5)).unwrap();
    let mut group = c.benchmark_group("traverse");

    group.bench_function("traverse_all", |b| b.iter(|| tree.traverse().count()));

    group.bench_function("find_by_target_hit", |b| {
        b.iter(|| tree.find_by_target("section_4_2.html"))
    });

    group.bench_function("find_by_target_miss", |b| {
        b.iter(|| tree.find_by_target("missing.html"))
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_traverse);
criterion_main!(benches);
