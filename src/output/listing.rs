//! Plain and long listing formatter
//!
//! Writes one line per entry as it arrives from the stream, in walk order.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::walker::{Entry, FileType, WalkSummary};

use super::EntryOutput;
use super::config::OutputConfig;
use super::utils::long_columns;

/// Line-per-entry formatter, optionally with long-listing columns.
///
/// Entries carrying an error are not listed; the caller reports them.
pub struct ListFormatter<W: WriteColor> {
    config: OutputConfig,
    out: W,
    dir_count: usize,
    file_count: usize,
}

impl ListFormatter<StandardStream> {
    pub fn stdout(config: OutputConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(config, StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> ListFormatter<W> {
    pub fn new(config: OutputConfig, out: W) -> Self {
        Self {
            config,
            out,
            dir_count: 0,
            file_count: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn color_for(file_type: Option<FileType>) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match file_type {
            Some(FileType::Directory) => {
                spec.set_fg(Some(Color::Blue)).set_bold(true);
            }
            Some(FileType::Symlink) => {
                spec.set_fg(Some(Color::Cyan));
            }
            Some(FileType::Other) => {
                spec.set_fg(Some(Color::Yellow));
            }
            _ => {}
        }
        spec
    }
}

impl<W: WriteColor> EntryOutput for ListFormatter<W> {
    fn output_entry(&mut self, entry: &Entry) -> io::Result<()> {
        if !entry.is_ok() {
            return Ok(());
        }

        let file_type = entry.file_type();
        if file_type == Some(FileType::Directory) {
            self.dir_count += 1;
        } else {
            self.file_count += 1;
        }

        if self.config.long {
            write!(self.out, "{} ", long_columns(entry))?;
        }

        self.out.set_color(&Self::color_for(file_type))?;
        write!(self.out, "{}", entry.rel_path())?;
        self.out.reset()?;

        if self.config.long {
            if let Some(target) = entry.link() {
                write!(self.out, " -> {}", target)?;
            }
        }
        writeln!(self.out)
    }

    fn finish(&mut self, summary: &WalkSummary) -> io::Result<()> {
        if self.config.long {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{} directories, {} files, {} errors",
                self.dir_count, self.file_count, summary.errors
            )?;
        }
        self.out.flush()
    }
}
