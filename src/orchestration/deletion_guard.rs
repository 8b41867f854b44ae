//! # Reverse-Deletion Guard
//!
//! Deletion is the only way a workflow instance rewinds, and it must rewind
//! in strict reverse order: only the most-advanced stage currently on file
//! may be deleted. Deleting an earlier-stage job while a later-stage job
//! exists would orphan the downstream record.

use crate::error::{DepotError, Result};
use crate::models::{StageJob, StageKind};

/// Check that `job` is the maximal-precedence job in `jobs`.
///
/// `jobs` is the full job set for the container, including `job` itself.
pub fn check_deletable(job: &StageJob, jobs: &[StageJob]) -> Result<()> {
    let blocking: Option<StageKind> = jobs
        .iter()
        .map(StageJob::kind)
        .filter(|kind| kind.precedence() > job.kind().precedence())
        .max_by_key(StageKind::precedence);

    match blocking {
        Some(blocking) => Err(DepotError::BlockedByDownstreamJob {
            stage: job.kind(),
            blocking,
        }),
        None => Ok(()),
    }
}
