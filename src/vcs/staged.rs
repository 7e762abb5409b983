//! Listing of files staged as pure additions.

use std::path::{Path, PathBuf};

use crate::core::errors::{GuardError, Result};
use crate::vcs::process::{ProcessInvocation, ProcessRunner};

/// Arguments for "diff staged, names only, additions only".
///
/// `-z` makes git print raw NUL-terminated paths instead of C-quoting
/// names with non-ASCII bytes, quotes, or control characters.
pub const STAGED_ADDITIONS_ARGS: [&str; 5] =
    ["diff", "--staged", "--name-only", "--diff-filter=A", "-z"];

/// Queries git for paths staged as additions (not modifications, deletions, or renames).
pub struct StagedAdditionsLister<'a, R: ProcessRunner + ?Sized> {
    runner: &'a R,
    git_binary: PathBuf,
}

impl<'a, R: ProcessRunner + ?Sized> StagedAdditionsLister<'a, R> {
    pub fn new(runner: &'a R, git_binary: impl AsRef<Path>) -> Self {
        Self {
            runner,
            git_binary: git_binary.as_ref().to_path_buf(),
        }
    }

    /// The exact command this lister runs.
    #[must_use]
    pub fn invocation(&self) -> ProcessInvocation {
        ProcessInvocation::new(&self.git_binary, STAGED_ADDITIONS_ARGS)
    }

    /// Paths as reported by git, relative to the repository root.
    pub fn list_staged_additions(&self) -> Result<Vec<PathBuf>> {
        let invocation = self.invocation();
        let output = self
            .runner
            .run(&invocation)
            .map_err(|source| GuardError::ToolInvocation {
                command: invocation.to_string(),
                source,
            })?;

        if !output.is_success() {
            let captured = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            return Err(GuardError::ToolFailure {
                command: invocation.to_string(),
                exit_code: output.exit_code.unwrap_or(-1),
                output: captured.to_string(),
            });
        }

        Ok(parse_nul_separated(&output.stdout))
    }
}

// Names are taken verbatim; leading or trailing spaces are part of the path.
fn parse_nul_separated(stdout: &str) -> Vec<PathBuf> {
    stdout
        .split('\0')
        .filter(|name| !name.is_empty())
        .map(PathBuf::from)
        .collect()
}
