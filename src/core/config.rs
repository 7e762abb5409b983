//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::{GuardError, Result};

/// Default size limit for newly added files, in MiB.
pub const DEFAULT_MAX_MIB: f64 = 1.0;

/// Full configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub check: CheckSettings,
    pub git: GitConfig,
    pub paths: PathsConfig,
}

/// What to do when git cannot list the staged additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ListFailurePolicy {
    /// Log the failure and evaluate an empty set (the commit is accepted).
    #[default]
    Lenient,
    /// Abort the check with a runtime error.
    Strict,
}

impl ListFailurePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ListFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListFailurePolicy {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("expected `lenient` or `strict`, got `{other}`")),
        }
    }
}

/// Per-invocation gate settings, passed by value into evaluation and rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckSettings {
    /// Size limit in MiB; `0` disables the gate.
    pub max_mib: f64,
    /// Print the remediation hint block on refusal.
    pub hint: bool,
    pub on_list_failure: ListFailurePolicy,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            max_mib: DEFAULT_MAX_MIB,
            hint: false,
            on_list_failure: ListFailurePolicy::Lenient,
        }
    }
}

impl CheckSettings {
    /// A zero threshold turns the gate off entirely.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_mib == 0.0
    }
}

/// External version-control tool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    pub binary: PathBuf,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("git"),
        }
    }
}

/// Filesystem paths used by csg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(skip)]
    pub config_file: PathBuf,
    /// Optional append-only activity log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonl_log: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[CSG-CONFIG] WARNING: HOME not set, falling back to /tmp for config path"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("csg").join("config.toml"),
            jsonl_log: None,
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| GuardError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(GuardError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for the activity log.
    ///
    /// FNV-1a keeps the value stable across processes and Rust releases.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CSG_MAX_MIB") {
            self.check.max_mib = parse_env("CSG_MAX_MIB", &raw)?;
        }
        if let Some(raw) = lookup("CSG_HINT") {
            self.check.hint = parse_env("CSG_HINT", &raw)?;
        }
        if let Some(raw) = lookup("CSG_ON_LIST_FAILURE") {
            self.check.on_list_failure = parse_env("CSG_ON_LIST_FAILURE", &raw)?;
        }
        if let Some(raw) = lookup("CSG_GIT_BINARY") {
            self.git.binary = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("CSG_JSONL_LOG") {
            self.paths.jsonl_log = Some(PathBuf::from(raw));
        }
        Ok(())
    }

    /// Check invariants that parsing alone cannot express.
    pub fn validate(&self) -> Result<()> {
        validate_max_mib(self.check.max_mib)?;
        if self.git.binary.as_os_str().is_empty() {
            return Err(GuardError::InvalidConfig {
                details: "git.binary must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// A threshold must be a finite, non-negative number of MiB.
pub fn validate_max_mib(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GuardError::InvalidConfig {
            details: format!("check.max_mib must be a finite number >= 0, got {value}"),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|error| GuardError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}
