//! CLI entry point for archwalk

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use archwalk::{
    CancelToken, EntryOutput, FileType, JsonLinesFormatter, ListFormatter, OutputConfig,
    WalkerConfig, walk,
};
use clap::{Parser, ValueEnum};
use log::{debug, info};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "archwalk")]
#[command(about = "Walk a directory tree in archive order, with filters")]
#[command(version)]
struct Args {
    /// File or directory to walk
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Do not list the root directory itself
    #[arg(long = "skip-root")]
    skip_root: bool,

    /// Maximum depth to list (-1 for unlimited; 0 behaves like 1)
    #[arg(short = 'L', long = "level", default_value = "-1", allow_hyphen_values = true)]
    level: i64,

    /// Only list paths matching GLOB (can be used multiple times)
    #[arg(short = 'P', long = "pattern", value_name = "GLOB")]
    patterns: Vec<String>,

    /// Skip directories matching GLOB and everything below them (can be used multiple times)
    #[arg(short = 'X', long = "skip-dir", value_name = "GLOB")]
    skip_dirs: Vec<String>,

    /// Skip pseudo-filesystem directories (proc, sys, dev, run)
    #[arg(long = "skip-pseudo-fs")]
    skip_pseudo_fs: bool,

    /// Only list entries of TYPE: file, dir, symlink, other (can be used multiple times)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    types: Vec<FileType>,

    /// Number of entries buffered between the walker and the output
    #[arg(long = "buffer", value_name = "N", default_value = "64")]
    buffer: usize,

    /// Stop walking after DURATION (e.g. 500ms, 10s, 1m)
    #[arg(long = "timeout", value_name = "DURATION")]
    timeout: Option<String>,

    /// Show type, mode, size and modification time
    #[arg(short = 'l', long = "long", conflicts_with = "json")]
    long: bool,

    /// Output one JSON object per entry
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Suppress warnings
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Increase logging verbosity (can be repeated)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn init_logging(&self) -> Result<(), log::SetLoggerError> {
        let mut verbosity: usize = 1;
        if self.verbose > 0 {
            verbosity += self.verbose as usize;
        } else if self.quiet {
            verbosity -= 1;
        }

        stderrlog::new()
            .module(module_path!())
            .verbosity(verbosity)
            .init()
    }

    fn walker_config(&self) -> WalkerConfig {
        let mut config = WalkerConfig::default()
            .max_recurse_depth(self.level)
            .fnmatch_patterns(self.patterns.iter().cloned())
            .skip_dir_patterns(self.skip_dirs.iter().cloned())
            .buffer_size(self.buffer);
        if self.skip_root {
            config = config.skip_root();
        }
        if self.skip_pseudo_fs {
            config = config.skip_pseudo_fs();
        }
        if !self.types.is_empty() {
            config = config.file_types(self.types.iter().copied());
        }
        config
    }
}

/// Parse a duration string like "500ms", "10s" or "1m".
fn parse_duration_string(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = args.init_logging() {
        eprintln!("archwalk: failed to initialize logging: {}", e);
    }

    let cancel = match args.timeout.as_ref() {
        Some(s) => {
            let timeout = parse_duration_string(s).unwrap_or_else(|e| {
                eprintln!("archwalk: invalid --timeout duration '{}': {}", s, e);
                process::exit(1);
            });
            CancelToken::with_timeout(timeout)
        }
        None => CancelToken::new(),
    };

    let config = args.walker_config();
    debug!("walker config: {:?}", config);

    let mut stream = match walk(&cancel, &args.path, config) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("archwalk: {}", e);
            process::exit(1);
        }
    };

    let mut output: Box<dyn EntryOutput> = if args.json {
        Box::new(JsonLinesFormatter::stdout())
    } else {
        Box::new(ListFormatter::stdout(OutputConfig {
            use_color: should_use_color(args.color),
            long: args.long,
        }))
    };

    let mut failed = false;
    for entry in stream.by_ref() {
        if let Some(err) = entry.error() {
            eprintln!("archwalk: {}: {}", entry.rel_path(), err);
            failed = true;
        }
        if let Err(e) = output.output_entry(&entry) {
            eprintln!("archwalk: error writing output: {}", e);
            process::exit(1);
        }
    }

    let summary = stream.finish();
    if summary.cancelled && cancel.is_cancelled() {
        info!("walk timed out after {} entries", summary.emitted);
    }
    if let Err(e) = output.finish(&summary) {
        eprintln!("archwalk: error writing output: {}", e);
        process::exit(1);
    }

    if failed {
        process::exit(1);
    }
}
