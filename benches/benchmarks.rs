//! Performance benchmarks for archwalk

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use archwalk::test_utils::TestTree;
use archwalk::walker::glob_match;
use archwalk::{CancelToken, FileType, WalkerConfig, walk};

fn drain(tree: &TestTree, config: WalkerConfig) -> usize {
    walk(&CancelToken::new(), tree.path(), config)
        .expect("walk should start")
        .count()
}

fn bench_full_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_walk");

    for &(dirs, files) in &[(10, 10), (50, 20), (100, 50)] {
        let tree = TestTree::new();
        tree.populate(dirs, 3, files);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", dirs, files)),
            &tree,
            |b, tree| b.iter(|| drain(tree, black_box(WalkerConfig::default()))),
        );
    }

    group.finish();
}

fn bench_buffer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_size");
    let tree = TestTree::new();
    tree.populate(50, 2, 20);

    for &size in &[1usize, 16, 64, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| drain(&tree, WalkerConfig::default().buffer_size(size)))
        });
    }

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let tree = TestTree::new();
    tree.populate(50, 3, 20);

    group.bench_function("fnmatch", |b| {
        b.iter(|| {
            drain(
                &tree,
                WalkerConfig::default().fnmatch_patterns(["d00*/l1/l2/f000?", "d01*"]),
            )
        })
    });

    group.bench_function("skip_dirs", |b| {
        b.iter(|| drain(&tree, WalkerConfig::default().skip_dir_patterns(["d0[0-2]*"])))
    });

    group.bench_function("dirs_only", |b| {
        b.iter(|| drain(&tree, WalkerConfig::default().file_types([FileType::Directory])))
    });

    group.finish();
}

fn bench_glob_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("glob_match");

    group.bench_function("literal", |b| {
        b.iter(|| glob_match(black_box("etc/hostname"), black_box("etc/hostname")))
    });

    group.bench_function("wildcard", |b| {
        b.iter(|| glob_match(black_box("usr/*/lib*.so"), black_box("usr/lib64/libc.so")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_walk,
    bench_buffer_sizes,
    bench_filters,
    bench_glob_match
);
criterion_main!(benches);
