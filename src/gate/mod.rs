//! The commit gate: list staged additions, evaluate sizes, render refusals.

pub mod evaluator;
pub mod report;

use crate::core::config::{CheckSettings, ListFailurePolicy};
use crate::core::errors::{GuardError, Result};
use crate::gate::evaluator::{Evaluation, LargeFileEvaluator, SizeProbe};
use crate::vcs::process::ProcessRunner;
use crate::vcs::staged::StagedAdditionsLister;

/// Everything one gate run produced, before presentation.
#[derive(Debug)]
pub struct CheckOutcome {
    pub evaluation: Evaluation,
    /// The gate was off (`max_mib == 0`); git was never queried.
    pub disabled: bool,
    /// Number of staged-addition paths git reported (duplicates included).
    pub listed: usize,
    /// Listing failure tolerated under [`ListFailurePolicy::Lenient`].
    pub list_error: Option<GuardError>,
}

/// Run the full gate: short-circuit when disabled, list staged additions,
/// apply the list-failure policy, then evaluate.
///
/// Under [`ListFailurePolicy::Strict`] a listing failure is returned as `Err`;
/// under `Lenient` it is carried in [`CheckOutcome::list_error`] and an empty
/// set is evaluated.
pub fn check_staged_additions<R, P>(
    lister: &StagedAdditionsLister<'_, R>,
    probe: &P,
    settings: CheckSettings,
) -> Result<CheckOutcome>
where
    R: ProcessRunner + ?Sized,
    P: SizeProbe + ?Sized,
{
    if settings.is_disabled() {
        return Ok(CheckOutcome {
            evaluation: Evaluation::accepted(),
            disabled: true,
            listed: 0,
            list_error: None,
        });
    }

    let (paths, list_error) = match lister.list_staged_additions() {
        Ok(paths) => (paths, None),
        Err(error) => match settings.on_list_failure {
            ListFailurePolicy::Strict => return Err(error),
            ListFailurePolicy::Lenient => (Vec::new(), Some(error)),
        },
    };

    let listed = paths.len();
    let evaluation = LargeFileEvaluator::new(probe).evaluate(paths, settings.max_mib);
    Ok(CheckOutcome {
        evaluation,
        disabled: false,
        listed,
        list_error,
    })
}
