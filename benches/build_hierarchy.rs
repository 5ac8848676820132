use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;
use zettelgraph::tree::{Entry, HierarchyBuilder};
use zettelgraph::next_child_id;

/// Synthetic vault: `roots` top-level notes, each with letter children and numbered
/// grandchildren, every third child missing so surrogates get synthesized.
fn synthetic_vault(roots: usize) -> Vec<Entry> {
    let mut entries = Vec::new();
    for r in 1..=roots.min(99) {
        entries.push(Entry::directory_at(format!("/v/{:02} Area", r)));
        entries.push(Entry::file_at(format!("/v/{:02} Root note.md", r)));
        for (i, letter) in ('a'..='j').enumerate() {
            if i % 3 != 2 {
                entries.push(Entry::file_at(format!(
                    "/v/{:02} Area/{:02}{} Child.md",
                    r, r, letter
                )));
            }
            for n in 1..=10 {
                entries.push(Entry::file_at(format!(
                    "/v/{:02} Area/{:02}{}{:02} Leaf.md",
                    r, r, letter, n
                )));
            }
        }
    }
    entries
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for roots in [10usize, 50, 99] {
        let entries = synthetic_vault(roots);
        let builder = HierarchyBuilder::new("/v").with_ignore_patterns(["**/.git/**", "**/*.tmp"]);
        group.bench_with_input(BenchmarkId::from_parameter(entries.len()), &entries, |b, entries| {
            b.iter(|| builder.build(black_box(entries)))
        });
    }
    group.finish();
}

fn bench_next_child_id(c: &mut Criterion) {
    let graph = HierarchyBuilder::new("/v").build(&synthetic_vault(50));
    let parent = Path::new("/v/25 Area/25a Child.md");
    c.bench_function("next_child_id", |b| {
        b.iter(|| next_child_id(black_box(&graph), black_box(parent)))
    });
}

criterion_group!(benches, bench_build, bench_next_child_id);
criterion_main!(benches);
