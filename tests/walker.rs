//! Walk order and filtering tests against a small root filesystem tree


use std::fs;
use std::path::Path;

use archwalk::{CancelToken, FileType, WalkError, Walker, WalkerConfig, walk};
use harness::{TestTree, walk_paths};

const FULL_WALK: &[&str] = &[
    ".",
    "dev",
    "dev/random",
    "etc",
    "etc/certs",
    "etc/certs/ca.crt",
    "etc/hostname",
    "lib",
    "lib/dynalib.so",
    "proc",
    "proc/1",
    "proc/1/exe",
    "proc/stat",
    "usr",
    "usr/bin",
    "usr/bin/cp",
    "usr/bin/mv",
];

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_iteration_dir_skip_root() {
    let tree = TestTree::rootfs();
    let stream = walk(&CancelToken::new(), tree.path(), WalkerConfig::default().skip_root()).unwrap();

    let mut rel_paths = Vec::new();
    for entry in stream {
        assert!(entry.is_ok());
        if cfg!(unix) && entry.rel_path() == "usr/bin/mv" {
            assert_eq!(entry.link(), Some("/usr/bin/cp"));
        }
        rel_paths.push(entry.rel_path().to_string());
    }

    assert_eq!(rel_paths, FULL_WALK[1..].to_vec());
}

#[test]
fn test_first_entry_is_root() {
    let tree = TestTree::rootfs();
    let mut stream = walk(&CancelToken::new(), tree.path(), WalkerConfig::default()).unwrap();
    let first = stream.next().unwrap();
    assert_eq!(first.rel_path(), ".");
    assert!(first.is_dir());
    assert_eq!(first.depth(), 0);
    assert!(first.link().is_none());
}

#[test]
fn test_parents_precede_children_and_siblings_sorted() {
    let tree = TestTree::new();
    tree.add_file("b/z", "");
    tree.add_file("b/a/deep", "");
    tree.add_file("a", "");
    tree.add_file("B", "");
    tree.add_dir("c/empty");

    let paths = walk_paths(tree.path(), WalkerConfig::default());
    assert_eq!(
        paths,
        vec![".", "B", "a", "b", "b/a", "b/a/deep", "b/z", "c", "c/empty"]
    );

    for (i, path) in paths.iter().enumerate() {
        if let Some((parent, _)) = path.rsplit_once('/') {
            let parent_pos = paths.iter().position(|p| p == parent).unwrap();
            assert!(parent_pos < i, "{} listed before its parent", path);
        }
    }
}

#[test]
fn test_full_paths_and_depths() {
    let tree = TestTree::rootfs();
    let stream = walk(&CancelToken::new(), tree.path(), WalkerConfig::default()).unwrap();
    for entry in stream {
        let expected_depth = if entry.rel_path() == "." {
            0
        } else {
            entry.rel_path().matches('/').count() + 1
        };
        assert_eq!(entry.depth(), expected_depth, "{}", entry.rel_path());
        if entry.rel_path() != "." {
            assert_eq!(entry.full_path(), tree.path().join(entry.rel_path()));
        }
    }
}

// ============================================================================
// Depth limits
// ============================================================================

#[test]
fn test_max_recurse_depth() {
    let cases: &[(i64, &[&str])] = &[
        (-1, FULL_WALK),
        // confusing case: zero behaves like one
        (0, &[".", "dev", "etc", "lib", "proc", "usr"]),
        (1, &[".", "dev", "etc", "lib", "proc", "usr"]),
        (
            2,
            &[
                ".",
                "dev",
                "dev/random",
                "etc",
                "etc/certs",
                "etc/hostname",
                "lib",
                "lib/dynalib.so",
                "proc",
                "proc/1",
                "proc/stat",
                "usr",
                "usr/bin",
            ],
        ),
        (3, FULL_WALK),
        (4, FULL_WALK),
    ];

    let tree = TestTree::rootfs();
    for (depth, expected) in cases {
        let paths = walk_paths(tree.path(), WalkerConfig::default().max_recurse_depth(*depth));
        assert_eq!(paths, expected.to_vec(), "max depth {}", depth);
    }
}

#[test]
fn test_depth_zero_and_one_identical_on_deeper_tree() {
    let tree = TestTree::new();
    tree.populate(3, 4, 2);
    let zero = walk_paths(tree.path(), WalkerConfig::default().max_recurse_depth(0));
    let one = walk_paths(tree.path(), WalkerConfig::default().max_recurse_depth(1));
    assert_eq!(zero, one);
    assert_eq!(zero, vec![".", "d000", "d001", "d002"]);
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_fnmatch_filter_reaches_matching_leaves() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default()
        .skip_root()
        .fnmatch_patterns(["dev/*", "lib"]);
    assert_eq!(walk_paths(tree.path(), config), vec!["dev/random", "lib"]);
}

#[test]
fn test_fnmatch_filter_applies_to_root() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default().fnmatch_patterns(["etc/*"]);
    assert_eq!(
        walk_paths(tree.path(), config),
        vec!["etc/certs", "etc/hostname"]
    );
}

#[test]
fn test_type_filter_directories() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default().file_types([FileType::Directory]);
    assert_eq!(
        walk_paths(tree.path(), config),
        vec![".", "dev", "etc", "etc/certs", "lib", "proc", "proc/1", "usr", "usr/bin"]
    );
}

#[cfg(unix)]
#[test]
fn test_type_filter_symlinks() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default().file_types([FileType::Symlink]);
    let stream = walk(&CancelToken::new(), tree.path(), config).unwrap();
    let entries: Vec<_> = stream.collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].rel_path(), "usr/bin/mv");
    assert_eq!(entries[0].file_type(), Some(FileType::Symlink));
    assert_eq!(entries[0].link(), Some("/usr/bin/cp"));
}

#[test]
fn test_filters_combine() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default()
        .fnmatch_patterns(["etc/*", "etc/*/*"])
        .file_types([FileType::Regular]);
    assert_eq!(
        walk_paths(tree.path(), config),
        vec!["etc/certs/ca.crt", "etc/hostname"]
    );
}

#[test]
fn test_skip_dir_patterns() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default()
        .max_recurse_depth(1)
        .skip_dir_patterns(["etc"]);
    assert_eq!(
        walk_paths(tree.path(), config),
        vec![".", "dev", "lib", "proc", "usr"]
    );
}

#[test]
fn test_skip_dir_patterns_nested() {
    let tree = TestTree::rootfs();
    tree.add_file("var/run/test/file.txt", "data");
    tree.add_file("var/lib/state", "data");

    let config = WalkerConfig::default().skip_dir_patterns(["var/run*"]);
    let paths = walk_paths(tree.path(), config);
    assert!(paths.iter().all(|p| !p.starts_with("var/run")), "{:?}", paths);
    assert!(paths.contains(&"var".to_string()));
    assert!(paths.contains(&"var/lib/state".to_string()));
}

#[test]
fn test_skip_dir_pattern_only_matches_directories() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default().skip_dir_patterns(["etc/hostname"]);
    let paths = walk_paths(tree.path(), config);
    assert!(paths.contains(&"etc/hostname".to_string()));
}

#[test]
fn test_skip_pseudo_fs() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default().max_recurse_depth(1).skip_pseudo_fs();
    assert_eq!(walk_paths(tree.path(), config), vec![".", "etc", "lib", "usr"]);
}

#[test]
fn test_skip_pseudo_fs_nested() {
    let tree = TestTree::new();
    tree.add_file("chroot/proc/self", "");
    tree.add_file("chroot/etc/passwd", "");
    let config = WalkerConfig::default().skip_pseudo_fs();
    assert_eq!(
        walk_paths(tree.path(), config),
        vec![".", "chroot", "chroot/etc", "chroot/etc/passwd"]
    );
}

// ============================================================================
// Roots
// ============================================================================

#[test]
fn test_iteration_file() {
    let tree = TestTree::rootfs();
    let paths = walk_paths(&tree.path().join("usr/bin/cp"), WalkerConfig::default());
    assert_eq!(paths, vec!["cp"]);
}

#[test]
fn test_file_root_ignores_options() {
    let tree = TestTree::rootfs();
    let config = WalkerConfig::default()
        .skip_root()
        .fnmatch_patterns(["nothing"])
        .file_types([FileType::Directory]);
    let paths = walk_paths(&tree.path().join("etc/hostname"), config);
    assert_eq!(paths, vec!["hostname"]);
}

#[cfg(unix)]
#[test]
fn test_iteration_symlink_root() {
    let tree = TestTree::rootfs();
    tree.add_file("original/original.txt", "");
    // Relative on purpose, so resolution happens against the link's directory.
    let new = tree.add_symlink("new", "original");

    let stream = walk(&CancelToken::new(), &new, WalkerConfig::default()).unwrap();
    let entries: Vec<_> = stream.collect();
    let paths: Vec<_> = entries.iter().map(|e| e.rel_path()).collect();
    assert_eq!(paths, vec![".", "original.txt"]);
    assert!(entries[0].is_dir());
    assert!(entries[0].link().is_none());
}

#[test]
fn test_iteration_not_found() {
    let tree = TestTree::rootfs();
    let result = walk(
        &CancelToken::new(),
        tree.path().join("doesntlivehere"),
        WalkerConfig::default(),
    );
    match result {
        Err(WalkError::Root { path, .. }) => assert!(path.ends_with("doesntlivehere")),
        Err(other) => panic!("expected root error, got {}", other),
        Ok(_) => panic!("missing root should fail"),
    }
}

#[test]
fn test_invalid_pattern_fails_walk() {
    let tree = TestTree::rootfs();
    let walker = Walker::new(WalkerConfig::default().skip_dir_patterns(["[oops"]));
    assert!(matches!(
        walker.walk(&CancelToken::new(), tree.path()),
        Err(WalkError::Pattern { .. })
    ));
}

#[test]
fn test_relative_root() {
    let tree = TestTree::rootfs();
    let cwd = std::env::current_dir().unwrap();
    let relative = pathdiff(tree.path(), &cwd);
    let paths = walk_paths(&relative, WalkerConfig::default().max_recurse_depth(1));
    assert_eq!(paths, vec![".", "dev", "etc", "lib", "proc", "usr"]);
}

/// Build a relative path from `base` to `target` using "..".
fn pathdiff(target: &Path, base: &Path) -> std::path::PathBuf {
    let components = |p: &Path| -> Vec<std::ffi::OsString> {
        fs::canonicalize(p)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_owned())
            .collect()
    };
    let target = components(target);
    let base = components(base);
    let common = target.iter().zip(&base).take_while(|(a, b)| a == b).count();
    let mut rel = std::path::PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for part in &target[common..] {
        rel.push(part);
    }
    rel
}
