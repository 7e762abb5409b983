#![forbid(unsafe_code)]

//! Commit Size Guard (csg) — pre-commit gate that refuses commits adding
//! files above a size threshold.
//!
//! One run:
//! 1. **List** — ask git for paths staged as pure additions
//! 2. **Evaluate** — stat each path, round up to whole KiB, compare against the MiB limit
//! 3. **Report** — render refused files and an optional remediation hint
//!
//! # Library usage
//!
//! ```rust,no_run
//! use commit_size_guard::prelude::*;
//!
//! let settings = CheckSettings::default();
//! let runner = SystemProcessRunner;
//! let lister = StagedAdditionsLister::new(&runner, "git");
//! let outcome = check_staged_additions(&lister, &FsSizeProbe, settings)?;
//! print!(
//!     "{}",
//!     render_report(&outcome.evaluation.refused, settings.max_mib, settings.hint, ReportStyle::plain())
//! );
//! std::process::exit(outcome.evaluation.verdict.exit_code());
//! # Ok::<(), GuardError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod gate;
pub mod logger;
pub mod vcs;
