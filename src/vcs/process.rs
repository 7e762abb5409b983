//! Typed external-process invocation.

#![allow(missing_docs)]

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;

/// A program plus its argument list. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ProcessInvocation {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ProcessInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs external programs. `Err` means the program could not be started.
pub trait ProcessRunner {
    fn run(&self, invocation: &ProcessInvocation) -> io::Result<ProcessOutput>;
}

/// Runs programs with `std::process::Command`, capturing stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &ProcessInvocation) -> io::Result<ProcessOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// In-memory mock implementation for deterministic tests.
///
/// Returns the same canned response for every invocation and records what
/// it was asked to run.
#[derive(Debug)]
pub struct MockProcessRunner {
    response: MockResponse,
    calls: RefCell<Vec<ProcessInvocation>>,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Output(ProcessOutput),
    SpawnError(io::ErrorKind),
}

impl MockProcessRunner {
    #[must_use]
    pub fn with_output(output: ProcessOutput) -> Self {
        Self {
            response: MockResponse::Output(output),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Simulate a program that cannot be launched (e.g. not installed).
    #[must_use]
    pub fn spawn_error(kind: io::ErrorKind) -> Self {
        Self {
            response: MockResponse::SpawnError(kind),
            calls: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ProcessInvocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, invocation: &ProcessInvocation) -> io::Result<ProcessOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        match &self.response {
            MockResponse::Output(output) => Ok(output.clone()),
            MockResponse::SpawnError(kind) => Err(io::Error::new(*kind, "mock spawn failure")),
        }
    }
}
