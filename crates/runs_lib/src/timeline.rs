//! Narrative generation: the story of an entry's records, one run at a time.
//!
//! A [`Narrative`] is what the site shows next to a run: a headline saying what
//! the run did to the records of its entry, and one detail sentence per record it
//! actually beat. The [`timeline`] operation replays every ever-approved run of
//! an entry and narrates each against its predecessors, which yields the content
//! of the entry's history page.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::compare::{self, RunTag};
use crate::models::Run;
use crate::time::{format_time, format_time_delta};

/// The human-readable story of one run against the records that preceded it.
#[derive(Serialize, Clone, Debug)]
pub struct Narrative {
    /// What the run did to the records of its entry.
    pub tag: RunTag,
    /// One sentence naming the player, the times, and the improvement when a
    /// record fell.
    pub headline: String,
    /// One sentence per record actually beaten, naming the previous holder, the
    /// previous time, and how long the record stood.
    pub details: Vec<String>,
}

/// One run of an entry's history, as shown on the timeline page.
#[derive(Serialize, Clone, Debug)]
pub struct TimelineEntry {
    /// The store id of the run.
    pub run_id: String,
    /// The display name of the player.
    pub player_name: String,
    /// The in-game time of the run, in milliseconds.
    pub time_ms: i64,
    /// The date shown next to the run, when known.
    pub date: Option<NaiveDate>,
    /// The story of the run against its predecessors.
    pub narrative: Narrative,
}

/// The elapsed days between the effective dates of two runs.
///
/// Partial days count as full ones. When either run has no effective date the
/// delta degrades to 0, so the narrative still reads instead of failing.
pub fn days_between(a: &Run, b: &Run) -> i64 {
    match (a.effective_date_ms(), b.effective_date_ms()) {
        (Some(ms_a), Some(ms_b)) => {
            let diff = (ms_a - ms_b).abs();
            (diff + 86_399_999) / 86_400_000
        }
        _ => 0,
    }
}

fn days_text(days: i64) -> String {
    if days == 1 {
        "1 day".to_owned()
    } else {
        format!("{days} days")
    }
}

/// The RTA text shown in narratives: the parsed value formatted canonically, or
/// the raw text when it doesn't parse. The store placeholder never surfaces.
fn rta_display(run: &Run) -> Option<String> {
    run.rta_ms()
        .map(format_time)
        .or_else(|| crate::models::normalize_rta(run.rta.clone()))
}

/// Narrates the target run against its priors.
///
/// The priors must all belong to the target's entry; use
/// [`select_prior_runs`](compare::select_prior_runs) or [`narrate_against`] to
/// build them. The headline always names the player and the formatted in-game
/// time, and carries the improvement when a record fell.
pub fn narrate(target: &Run, priors: &[&Run]) -> Narrative {
    let tag = compare::classify(target, priors);
    let player = &target.player_name;
    let igt = format_time(target.time_ms);
    let rta = rta_display(target);
    let rta_suffix = rta
        .as_deref()
        .map(|text| format!(" (RTA {text})"))
        .unwrap_or_default();

    let mut details = Vec::new();

    let headline = match tag {
        RunTag::New => format!("{player} sets the first record with {igt}{rta_suffix}"),
        RunTag::Run => format!("{player} logs a run of {igt}{rta_suffix}"),
        RunTag::Igt => {
            // classify only answers Igt when a prior exists.
            let holder = compare::best_igt(priors);
            let delta = holder
                .map(|holder| format_time_delta(holder.time_ms, target.time_ms))
                .unwrap_or_default();
            if let Some(holder) = holder {
                details.push(beaten_igt_detail(target, holder));
            }
            format!("{player} takes the IGT record with {igt}, beating it by {delta}{rta_suffix}")
        }
        RunTag::Rt => {
            let igt_part = format!(" (IGT {igt})");
            let rta_text = rta.as_deref().unwrap_or_default();
            match compare::best_rta(priors) {
                Some((holder, holder_ms)) => {
                    let target_ms = target.rta_ms().unwrap_or_default();
                    details.push(beaten_rta_detail(target, holder, holder_ms));
                    format!(
                        "{player} takes the RTA record with {rta_text}, beating it by {delta}{igt_part}",
                        delta = format_time_delta(holder_ms, target_ms),
                    )
                }
                None => format!("{player} sets the first RTA record with {rta_text}{igt_part}"),
            }
        }
        RunTag::RtAndIgt => {
            let igt_holder = compare::best_igt(priors);
            let igt_delta = igt_holder
                .map(|holder| format_time_delta(holder.time_ms, target.time_ms))
                .unwrap_or_default();
            if let Some(holder) = igt_holder {
                details.push(beaten_igt_detail(target, holder));
            }
            let rta_text = rta.as_deref().unwrap_or_default();
            match compare::best_rta(priors) {
                Some((holder, holder_ms)) => {
                    let target_ms = target.rta_ms().unwrap_or_default();
                    details.push(beaten_rta_detail(target, holder, holder_ms));
                    format!(
                        "{player} takes both records with {igt} (RTA {rta_text}), \
                         beating the IGT record by {igt_delta} and the RTA record by {rta_delta}",
                        rta_delta = format_time_delta(holder_ms, target_ms),
                    )
                }
                None => format!(
                    "{player} takes the IGT record with {igt}, beating it by {igt_delta}, \
                     and sets the first RTA record with {rta_text}"
                ),
            }
        }
    };

    Narrative { tag, headline, details }
}

fn beaten_igt_detail(target: &Run, holder: &Run) -> String {
    format!(
        "Beats {}'s IGT record of {}, set {} earlier.",
        holder.player_name,
        format_time(holder.time_ms),
        days_text(days_between(target, holder)),
    )
}

fn beaten_rta_detail(target: &Run, holder: &Run, holder_ms: i64) -> String {
    format!(
        "Beats {}'s RTA record of {}, set {} earlier.",
        holder.player_name,
        format_time(holder_ms),
        days_text(days_between(target, holder)),
    )
}

/// Narrates one run against the record history of its entry in the archive.
///
/// Priors are the ever-approved runs of the entry that came strictly earlier,
/// so an approval preview and the timeline page tell the same story.
pub fn narrate_against(target: &Run, all_runs: &[Run]) -> Narrative {
    let priors: Vec<&Run> = compare::select_prior_runs(target, all_runs)
        .into_iter()
        .filter(|run| run.status.was_approved())
        .collect();
    narrate(target, &priors)
}

/// Replays the record history of one entry.
///
/// Every ever-approved run of the entry, in chronological order, narrated
/// against its predecessors. Rejected and pending runs never appear.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(runs, variables), fields(runs = runs.len()))
)]
pub fn timeline(
    runs: &[Run],
    category_id: &str,
    variables: &BTreeMap<String, String>,
) -> Vec<TimelineEntry> {
    let mut eligible: Vec<&Run> = runs
        .iter()
        .filter(|run| {
            run.status.was_approved()
                && run.category_id == category_id
                && run.variables == *variables
        })
        .collect();
    eligible.sort_by(|a, b| compare::chronological(a, b));

    eligible
        .iter()
        .enumerate()
        .map(|(i, run)| TimelineEntry {
            run_id: run.id.clone(),
            player_name: run.player_name.clone(),
            time_ms: run.time_ms,
            date: run.display_date(),
            narrative: narrate(run, &eligible[..i]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::RunStatus;

    fn run(id: &str, player: &str, time_ms: i64, rta: Option<&str>, day: u32) -> Run {
        Run {
            id: id.to_owned(),
            user_id: format!("u-{player}"),
            player_name: player.to_owned(),
            category_id: "frosted-hollow".to_owned(),
            variables: BTreeMap::from([("star".to_owned(), "3".to_owned())]),
            time_ms,
            rta: rta.map(str::to_owned),
            date_achieved: NaiveDate::from_ymd_opt(2024, 3, day),
            submitted_at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(10, 0, 0),
            status: RunStatus::Approved,
            video_url: None,
        }
    }

    #[test]
    fn first_run_narrates_as_a_new_record() {
        let target = run("t", "Alex", 65_000, Some("-"), 5);
        let narrative = narrate(&target, &[]);

        assert_eq!(narrative.tag, RunTag::New);
        assert!(narrative.headline.contains("Alex"));
        assert!(narrative.headline.contains("1:05.000"));
        assert!(!narrative.headline.contains("RTA"));
        assert!(narrative.details.is_empty());
    }

    #[test]
    fn igt_improvement_carries_the_delta_and_one_detail() {
        let prior = run("p", "Brie", 70_000, None, 2);
        let target = run("t", "Alex", 60_000, None, 5);
        let narrative = narrate(&target, &[&prior]);

        assert_eq!(narrative.tag, RunTag::Igt);
        assert!(narrative.headline.contains("10\"00"));
        assert_eq!(narrative.details.len(), 1);
        assert!(narrative.details[0].contains("Brie"));
        assert!(narrative.details[0].contains("1:10.000"));
        assert!(narrative.details[0].contains("3 days"));
    }

    #[test]
    fn double_record_narrates_both_improvements() {
        let igt_holder = run("p1", "Brie", 70_000, Some("1:14.000"), 1);
        let rta_holder = run("p2", "Chris", 71_000, Some("1:12.000"), 2);
        let target = run("t", "Alex", 65_000, Some("1:08.500"), 5);
        let narrative = narrate(&target, &[&igt_holder, &rta_holder]);

        assert_eq!(narrative.tag, RunTag::RtAndIgt);
        assert!(narrative.headline.contains("03\"50"));
        assert_eq!(narrative.details.len(), 2);
        assert!(narrative.details[0].contains("Brie"));
        assert!(narrative.details[1].contains("Chris"));
    }

    #[test]
    fn day_deltas_round_up_and_degrade_to_zero() {
        let mut a = run("a", "Alex", 1000, None, 5);
        let b = run("b", "Brie", 1000, None, 2);
        assert_eq!(days_between(&a, &b), 3);
        assert_eq!(days_between(&a, &a), 0);

        // A date-less run degrades the delta instead of failing.
        a.date_achieved = None;
        a.submitted_at = None;
        assert_eq!(days_between(&a, &b), 0);

        // Partial days count as full ones.
        let mut late = run("c", "Cass", 1000, None, 2);
        late.date_achieved = None;
        late.submitted_at = NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0);
        assert_eq!(days_between(&late, &b), 1);

        // One full day plus a few hours carries to two.
        let mut later = run("d", "Dana", 1000, None, 3);
        later.date_achieved = None;
        later.submitted_at = NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0);
        assert_eq!(days_between(&later, &b), 2);
    }

    #[test]
    fn timeline_replays_ever_approved_runs_in_order() {
        let mut first = run("a", "Brie", 70_000, None, 1);
        first.status = RunStatus::Obsolete;
        let second = run("b", "Brie", 68_000, None, 3);
        let third = run("c", "Alex", 65_000, None, 5);
        let mut rejected = run("d", "Mallory", 1_000, None, 2);
        rejected.status = RunStatus::Rejected;
        let mut pending = run("e", "Dana", 60_000, None, 6);
        pending.status = RunStatus::Pending;

        let runs = vec![third, rejected, first, pending, second];
        let variables = BTreeMap::from([("star".to_owned(), "3".to_owned())]);
        let entries = timeline(&runs, "frosted-hollow", &variables);

        let ids: Vec<&str> = entries.iter().map(|e| e.run_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(entries[0].narrative.tag, RunTag::New);
        assert_eq!(entries[1].narrative.tag, RunTag::Igt);
        assert_eq!(entries[2].narrative.tag, RunTag::Igt);

        // The superseded run still holds its place in the story.
        assert!(entries[1].narrative.details[0].contains("Brie"));
    }

    #[test]
    fn timeline_and_single_narration_tell_the_same_story() {
        let first = run("a", "Brie", 70_000, None, 1);
        let second = run("b", "Alex", 65_000, None, 5);
        let runs = vec![first, second.clone()];

        let variables = BTreeMap::from([("star".to_owned(), "3".to_owned())]);
        let from_timeline = timeline(&runs, "frosted-hollow", &variables)
            .pop()
            .unwrap()
            .narrative;
        let direct = narrate_against(&second, &runs);

        assert_eq!(from_timeline.headline, direct.headline);
        assert_eq!(from_timeline.details, direct.details);
    }
}
