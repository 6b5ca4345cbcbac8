//! Pruning and emission filters for walking

use std::collections::HashSet;

use glob::{MatchOptions, Pattern};

use crate::error::WalkError;

use super::config::WalkerConfig;
use super::entry::FileType;

/// Directory names treated as pseudo-filesystem mount points.
pub const PSEUDO_FS_NAMES: &[&str] = &["proc", "sys", "dev", "run"];

// Wildcards never cross a path separator, so "dev/*" does not reach "dev/a/b".
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled form of the filtering part of a [`WalkerConfig`].
#[derive(Debug, Clone)]
pub struct EntryFilter {
    fnmatch: Vec<Pattern>,
    skip_dirs: Vec<Pattern>,
    skip_pseudo_fs: bool,
    file_types: Option<HashSet<FileType>>,
}

impl EntryFilter {
    /// Compile the patterns in `config`, failing on the first invalid one.
    pub fn new(config: &WalkerConfig) -> Result<Self, WalkError> {
        Ok(Self {
            fnmatch: compile(&config.fnmatch_patterns)?,
            skip_dirs: compile(&config.skip_dir_patterns)?,
            skip_pseudo_fs: config.skip_pseudo_fs,
            file_types: config.file_types.clone(),
        })
    }

    /// Check if a directory should be pruned: neither emitted nor descended.
    pub fn should_prune(&self, rel_path: &str, name: &str) -> bool {
        if self.skip_pseudo_fs && PSEUDO_FS_NAMES.contains(&name) {
            return true;
        }
        self.skip_dirs.iter().any(|p| p.matches_with(rel_path, MATCH_OPTIONS))
    }

    /// Check if an entry that was reached should be emitted.
    pub fn should_emit(&self, rel_path: &str, file_type: FileType) -> bool {
        if let Some(types) = &self.file_types {
            if !types.contains(&file_type) {
                return false;
            }
        }
        if !self.fnmatch.is_empty()
            && !self.fnmatch.iter().any(|p| p.matches_with(rel_path, MATCH_OPTIONS))
        {
            return false;
        }
        true
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, WalkError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| WalkError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Match a glob pattern against a relative path with walker semantics.
pub fn glob_match(pattern: &str, rel_path: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches_with(rel_path, MATCH_OPTIONS))
        .unwrap_or(false)
}
