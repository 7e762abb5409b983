//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use commit_size_guard::prelude::*;
//! ```

// Core
pub use crate::core::config::{CheckSettings, Config, ListFailurePolicy};
pub use crate::core::errors::{GuardError, Result};

// Gate
pub use crate::gate::evaluator::{
    Evaluation, FsSizeProbe, LargeFileEvaluator, RefusedFile, SizeMeasurement, SizeProbe,
    SkippedFile, Verdict,
};
pub use crate::gate::report::{ReportStyle, render_report};
pub use crate::gate::{CheckOutcome, check_staged_additions};

// Version control
pub use crate::vcs::process::{ProcessInvocation, ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use crate::vcs::staged::StagedAdditionsLister;
