//! Moderation planning: status transitions, supersede plans and archive audits.
//!
//! The hosted store applies the actual status changes; this module computes what
//! should happen, so that a moderator sees the consequences of an approval before
//! confirming it and so that the archive can be checked for drift.

use itertools::Itertools;

use crate::catalog;
use crate::compare;
use crate::error::{RunsError, RunsResult};
use crate::key;
use crate::models::{Run, RunStatus};

/// Checks a status change against the moderation lifecycle.
pub fn ensure_transition(from: RunStatus, to: RunStatus) -> RunsResult {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(RunsError::InvalidTransition { from, to })
    }
}

/// An approved run that approving the target would supersede.
#[derive(Clone, Copy, Debug)]
pub struct Superseded<'a> {
    /// The run that would flip to obsolete.
    pub run: &'a Run,
    /// Whether the target actually improves on it. When this is `false` the
    /// approval would supersede a faster run, which a moderator usually wants
    /// to look at twice.
    pub improves: bool,
}

/// Plans the supersedes of approving the target.
///
/// The plan lists every approved run sharing the target's personal-best key
/// with a different id. Applying it (flipping them all to obsolete and the
/// target to approved) restores the "at most one approved run per personal-best
/// key" rule. The plan comes back in chronological order.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(target, all_runs), fields(target = %target.id))
)]
pub fn supersede_plan<'a>(target: &Run, all_runs: &'a [Run]) -> Vec<Superseded<'a>> {
    let pb_key = key::pb_key(target);
    let mut plan: Vec<Superseded<'a>> = all_runs
        .iter()
        .filter(|run| {
            run.id != target.id
                && run.status == RunStatus::Approved
                && key::pb_key(run) == pb_key
        })
        .map(|run| Superseded {
            run,
            improves: target.time_ms < run.time_ms,
        })
        .collect();
    plan.sort_by(|a, b| compare::chronological(a.run, b.run));
    plan
}

/// What an archive audit found. See [`audit`].
#[derive(Debug, Default)]
pub struct AuditReport {
    /// Personal-best keys currently holding more than one approved run, with
    /// the ids of those runs in chronological order.
    pub duplicate_approved: Vec<(String, Vec<String>)>,
    /// Ids of approved runs whose entry identity is absent from the catalog.
    pub unknown_entries: Vec<String>,
}

impl AuditReport {
    /// Whether the audit found nothing to report.
    pub fn is_clean(&self) -> bool {
        self.duplicate_approved.is_empty() && self.unknown_entries.is_empty()
    }
}

/// Audits the archive for drift the store should never have let in.
///
/// The store enforces its rules at write time, but hand edits and old exports
/// leave traces; running the audit after an import is how those get caught.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(all_runs), fields(runs = all_runs.len()))
)]
pub fn audit(all_runs: &[Run]) -> AuditReport {
    let approved: Vec<&Run> = all_runs
        .iter()
        .filter(|run| run.status == RunStatus::Approved)
        .collect();

    let mut duplicate_approved: Vec<(String, Vec<String>)> = approved
        .iter()
        .copied()
        .into_group_map_by(|run| key::pb_key(run))
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(pb_key, mut group)| {
            group.sort_by(|a, b| compare::chronological(a, b));
            let ids = group.into_iter().map(|run| run.id.clone()).collect();
            (pb_key, ids)
        })
        .collect();
    duplicate_approved.sort_by(|a, b| a.0.cmp(&b.0));

    let mut strays: Vec<&Run> = approved
        .into_iter()
        .filter(|run| !catalog::entry_exists(&run.category_id, &run.variables))
        .collect();
    strays.sort_by(|a, b| compare::chronological(a, b));
    let unknown_entries = strays.into_iter().map(|run| run.id.clone()).collect();

    AuditReport {
        duplicate_approved,
        unknown_entries,
    }
}
