//! CSG-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Top-level error type for the commit size guard.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("[CSG-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CSG-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CSG-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CSG-2001] failed to run `{command}`: {source}")]
    ToolInvocation {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[CSG-2002] command `{command}` returned unexpected exit code {exit_code} (expected 0): {output}")]
    ToolFailure {
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("[CSG-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CSG-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GuardError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "CSG-1001",
            Self::MissingConfig { .. } => "CSG-1002",
            Self::ConfigParse { .. } => "CSG-1003",
            Self::ToolInvocation { .. } => "CSG-2001",
            Self::ToolFailure { .. } => "CSG-2002",
            Self::Serialization { .. } => "CSG-2101",
            Self::Io { .. } => "CSG-3002",
        }
    }

    /// Whether the error came from the external version-control tool.
    #[must_use]
    pub const fn is_external_tool(&self) -> bool {
        matches!(self, Self::ToolInvocation { .. } | Self::ToolFailure { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for GuardError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GuardError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}
