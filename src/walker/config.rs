//! Configuration types for walkers

use std::collections::HashSet;

use super::entry::FileType;

const DEFAULT_BUFFER_SIZE: usize = 64;

/// Configuration for walking behavior.
///
/// Start from [`WalkerConfig::default`] and chain option methods. The config
/// is moved into the producer thread when the walk starts, so it cannot
/// change mid-walk.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Do not emit the root directory itself (its children still are).
    pub skip_root: bool,
    /// Maximum depth of emitted entries. Negative means unlimited, and 0 is
    /// treated as 1 (see [`effective_max_depth`](Self::effective_max_depth)).
    pub max_recurse_depth: i64,
    /// Only emit entries whose relative path matches one of these globs.
    pub fnmatch_patterns: Vec<String>,
    /// Prune directories whose relative path matches one of these globs.
    pub skip_dir_patterns: Vec<String>,
    /// Prune well-known pseudo-filesystem directories at any depth.
    pub skip_pseudo_fs: bool,
    /// Only emit entries of these types. `None` emits every type.
    pub file_types: Option<HashSet<FileType>>,
    /// Capacity of the channel between producer and consumer.
    pub buffer_size: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            skip_root: false,
            max_recurse_depth: -1,
            fnmatch_patterns: Vec::new(),
            skip_dir_patterns: Vec::new(),
            skip_pseudo_fs: false,
            file_types: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl WalkerConfig {
    pub fn skip_root(mut self) -> Self {
        self.skip_root = true;
        self
    }

    pub fn max_recurse_depth(mut self, depth: i64) -> Self {
        self.max_recurse_depth = depth;
        self
    }

    /// Append emission globs, keeping first-seen order and dropping duplicates.
    pub fn fnmatch_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.fnmatch_patterns, patterns);
        self
    }

    /// Append pruning globs, keeping first-seen order and dropping duplicates.
    pub fn skip_dir_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.skip_dir_patterns, patterns);
        self
    }

    pub fn skip_pseudo_fs(mut self) -> Self {
        self.skip_pseudo_fs = true;
        self
    }

    /// Restrict emission to the given types. Repeated calls accumulate.
    pub fn file_types<I: IntoIterator<Item = FileType>>(mut self, types: I) -> Self {
        self.file_types.get_or_insert_with(HashSet::new).extend(types);
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Depth limit actually applied during traversal.
    ///
    /// A configured depth of 0 behaves exactly like 1: the root and its
    /// immediate children are emitted. Consumers rely on this, so it stays.
    pub fn effective_max_depth(&self) -> Option<usize> {
        match self.max_recurse_depth {
            d if d < 0 => None,
            0 => Some(1),
            d => Some(usize::try_from(d).unwrap_or(usize::MAX)),
        }
    }
}

fn extend_unique<I, S>(target: &mut Vec<String>, patterns: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for pattern in patterns {
        let pattern = pattern.into();
        if !target.contains(&pattern) {
            target.push(pattern);
        }
    }
}
