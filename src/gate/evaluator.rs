//! Size evaluation of staged additions against the MiB threshold.
//!
//! Byte counts are rounded *up* to whole KiB before the comparison, so a
//! file one byte over a KiB boundary counts as the next KiB. The comparison
//! itself is strict: a file exactly at the limit is accepted.

#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Bytes per KiB, and KiB per MiB.
pub const KIB: u64 = 1024;

/// Accept/refuse outcome of one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Refuse,
}

impl Verdict {
    /// Process exit status for this verdict.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Accept => 0,
            Self::Refuse => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Refuse => "refuse",
        }
    }
}

/// On-disk size of one staged file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeMeasurement {
    pub bytes: u64,
    /// `ceil(bytes / 1024)`.
    pub kib: u64,
    /// `kib / 1024`, kept in the comparison unit rather than re-derived from bytes.
    pub mib: f64,
}

impl SizeMeasurement {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_bytes(bytes: u64) -> Self {
        let kib = bytes.div_ceil(KIB);
        Self {
            bytes,
            kib,
            mib: kib as f64 / KIB as f64,
        }
    }
}

/// A staged addition over the limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefusedFile {
    pub path: PathBuf,
    #[serde(flatten)]
    pub size: SizeMeasurement,
}

/// A staged addition that could not be measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Result of evaluating one set of staged additions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub verdict: Verdict,
    /// Sorted by path.
    pub refused: Vec<RefusedFile>,
    /// Paths whose stat failed; neither accepted nor refused.
    pub skipped: Vec<SkippedFile>,
}

impl Evaluation {
    #[must_use]
    pub const fn accepted() -> Self {
        Self {
            verdict: Verdict::Accept,
            refused: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Largest refused size in MiB, or `None` when nothing was refused.
    #[must_use]
    pub fn max_refused_mib(&self) -> Option<f64> {
        max_refused_mib(&self.refused)
    }
}

/// Largest `mib` across refused records.
#[must_use]
pub fn max_refused_mib(refused: &[RefusedFile]) -> Option<f64> {
    refused.iter().map(|r| r.size.mib).reduce(f64::max)
}

/// Filesystem seam: the size in bytes of a path.
pub trait SizeProbe {
    fn file_size(&self, path: &Path) -> io::Result<u64>;
}

/// Reads sizes with `std::fs::metadata` (follows symlinks).
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSizeProbe;

impl SizeProbe for FsSizeProbe {
    fn file_size(&self, path: &Path) -> io::Result<u64> {
        fs::metadata(path).map(|meta| meta.len())
    }
}

/// Classifies staged additions against a MiB threshold.
pub struct LargeFileEvaluator<'a, P: SizeProbe + ?Sized> {
    probe: &'a P,
}

impl<'a, P: SizeProbe + ?Sized> LargeFileEvaluator<'a, P> {
    pub fn new(probe: &'a P) -> Self {
        Self { probe }
    }

    /// Evaluate `paths` against `max_mib`.
    ///
    /// A zero threshold accepts immediately without touching the filesystem.
    /// A path that cannot be stat'ed is recorded in `skipped` and the rest
    /// are still evaluated.
    pub fn evaluate<I>(&self, paths: I, max_mib: f64) -> Evaluation
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        if max_mib == 0.0 {
            return Evaluation::accepted();
        }

        let unique: BTreeSet<PathBuf> = paths.into_iter().map(Into::into).collect();
        let threshold_kib = max_mib * 1024.0;

        let mut refused = Vec::new();
        let mut skipped = Vec::new();
        for path in unique {
            match self.probe.file_size(&path) {
                Ok(bytes) => {
                    let size = SizeMeasurement::from_bytes(bytes);
                    if exceeds(size.kib, threshold_kib) {
                        refused.push(RefusedFile { path, size });
                    }
                }
                Err(error) => skipped.push(SkippedFile {
                    path,
                    error: error.to_string(),
                }),
            }
        }

        let verdict = if refused.is_empty() {
            Verdict::Accept
        } else {
            Verdict::Refuse
        };
        Evaluation {
            verdict,
            refused,
            skipped,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn exceeds(kib: u64, threshold_kib: f64) -> bool {
    kib as f64 > threshold_kib
}
