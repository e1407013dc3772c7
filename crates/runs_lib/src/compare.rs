//! The record comparator: chronological ordering, prior-run selection, best-time
//! resolution and record classification.
//!
//! Everything here is pure. The caller decides which runs are eligible for a
//! comparison (see [`select_prior_runs`]); the comparator only answers "which of
//! these was the record, and did the target beat it".

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::Run;

/// The classification of a run against its prior runs, from the point of view of
/// the records of its entry.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum RunTag {
    /// The first run ever on its entry.
    New,
    /// Beat both the RTA record and the IGT record.
    RtAndIgt,
    /// Beat the RTA record only.
    Rt,
    /// Beat the IGT record only.
    Igt,
    /// Beat nothing. Still a run.
    Run,
}

impl RunTag {
    /// A short label for table output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::RtAndIgt => "RT+IGT",
            Self::Rt => "RT",
            Self::Igt => "IGT",
            Self::Run => "RUN",
        }
    }
}

impl std::fmt::Display for RunTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The total chronological order of the runs.
///
/// Runs order by [`sort_ms`](Run::sort_ms); equal timestamps (including two
/// undated runs, which both sort at 0) fall back to the lexicographic order of
/// the store ids, which are unique. So for two distinct runs the order never
/// answers `Equal`.
pub fn chronological(a: &Run, b: &Run) -> Ordering {
    a.sort_ms()
        .cmp(&b.sort_ms())
        .then_with(|| a.id.cmp(&b.id))
}

/// Whether `a` comes strictly before `b` under [`chronological`].
pub fn is_earlier(a: &Run, b: &Run) -> bool {
    chronological(a, b) == Ordering::Less
}

/// Selects the runs the target competes against: same entry identity, different
/// id, strictly earlier. Returned in chronological order.
///
/// Status filtering is the caller's concern. At approval time the caller passes
/// the then-approved runs; a timeline replay passes every ever-approved run so
/// that superseded record holders still appear in the history.
pub fn select_prior_runs<'a>(target: &Run, all_runs: &'a [Run]) -> Vec<&'a Run> {
    let mut priors: Vec<&Run> = all_runs
        .iter()
        .filter(|run| run.id != target.id && run.same_entry(target) && is_earlier(run, target))
        .collect();
    priors.sort_by(|a, b| chronological(a, b));
    priors
}

/// The prior holding the IGT record: minimum `time_ms`, ties resolved to the
/// earliest run.
pub fn best_igt<'a>(priors: &[&'a Run]) -> Option<&'a Run> {
    priors
        .iter()
        .copied()
        .min_by(|a, b| a.time_ms.cmp(&b.time_ms).then_with(|| chronological(a, b)))
}

/// The prior holding the RTA record, with its parsed millisecond value.
///
/// Only priors whose RTA text parses as a time compete; a prior with garbled
/// RTA text is silently excluded rather than treated as an error.
pub fn best_rta<'a>(priors: &[&'a Run]) -> Option<(&'a Run, i64)> {
    priors
        .iter()
        .filter_map(|run| run.rta_ms().map(|ms| (*run, ms)))
        .min_by(|(run_a, ms_a), (run_b, ms_b)| {
            ms_a.cmp(ms_b).then_with(|| chronological(run_a, run_b))
        })
}

/// Classifies the target against its priors.
///
/// No priors means [`New`](RunTag::New). Otherwise the target beats the IGT
/// record when its `time_ms` is strictly lower than the best prior IGT, and
/// beats the RTA record when its own RTA parses and either no prior RTA record
/// exists or the parsed value is strictly lower.
pub fn classify(target: &Run, priors: &[&Run]) -> RunTag {
    if priors.is_empty() {
        return RunTag::New;
    }

    let beat_igt = best_igt(priors).is_some_and(|best| target.time_ms < best.time_ms);
    let beat_rta = match target.rta_ms() {
        Some(target_rta) => best_rta(priors).is_none_or(|(_, best_ms)| target_rta < best_ms),
        None => false,
    };

    match (beat_rta, beat_igt) {
        (true, true) => RunTag::RtAndIgt,
        (true, false) => RunTag::Rt,
        (false, true) => RunTag::Igt,
        (false, false) => RunTag::Run,
    }
}
