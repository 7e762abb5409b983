//! Tagged diagnostics on stderr, filtered by verbosity.

#![allow(missing_docs)]

use std::io::{self, Write};

/// How chatty stderr diagnostics are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Everything, including progress lines.
    Verbose,
}

impl Verbosity {
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

/// Writes `[TAG] message` lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    verbosity: Verbosity,
}

impl Console {
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn info(&self, tag: &str, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            emit(tag, message);
        }
    }

    pub fn warn(&self, tag: &str, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            emit(tag, message);
        }
    }

    pub fn error(&self, tag: &str, message: &str) {
        emit(tag, message);
    }
}

fn emit(tag: &str, message: &str) {
    let _ = writeln!(io::stderr().lock(), "{}", format_line(tag, message));
}

fn format_line(tag: &str, message: &str) -> String {
    format!("[{tag}] {message}")
}
