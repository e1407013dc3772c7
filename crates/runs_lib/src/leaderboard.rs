//! Leaderboard assembly from approved runs.
//!
//! A leaderboard holds one row per player: their personal best on the entry,
//! ordered by in-game time and ranked with standard competition ranking (two
//! equal times share a rank, and the next distinct time takes the rank it would
//! have with them counted, as in 1224).

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::compare;
use crate::key;
use crate::models::{Run, RunStatus};

/// One row of a leaderboard.
#[derive(Serialize, Clone, Debug)]
pub struct Row {
    /// The competition rank of the row.
    pub rank: u32,
    /// The display name of the player.
    pub player_name: String,
    /// The in-game time of the personal best, in milliseconds.
    pub time_ms: i64,
    /// The parsed real-time attack, when the run carries one that parses.
    pub rta_ms: Option<i64>,
    /// A link to a recording of the run, if any.
    pub video_url: Option<String>,
    /// The store id of the run backing the row.
    pub run_id: String,
}

/// Reduces the approved runs to one personal best per personal-best key.
///
/// The best is the lowest `time_ms`; a tie goes to the earliest run. The result
/// comes back in chronological order.
pub fn personal_bests(runs: &[Run]) -> Vec<&Run> {
    let mut bests: Vec<&Run> = runs
        .iter()
        .filter(|run| run.status == RunStatus::Approved)
        .into_group_map_by(|run| key::pb_key(run))
        .into_values()
        .filter_map(|group| {
            group.into_iter().min_by(|a, b| {
                a.time_ms
                    .cmp(&b.time_ms)
                    .then_with(|| compare::chronological(a, b))
            })
        })
        .collect();
    bests.sort_by(|a, b| compare::chronological(a, b));
    bests
}

/// Assembles the leaderboard of one entry.
///
/// Personal bests of the matching entry, ordered by in-game time with the
/// chronological tiebreak, ranked 1224.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(runs, variables), fields(runs = runs.len()))
)]
pub fn leaderboard(
    runs: &[Run],
    category_id: &str,
    variables: &BTreeMap<String, String>,
) -> Vec<Row> {
    let mut bests: Vec<&Run> = personal_bests(runs)
        .into_iter()
        .filter(|run| run.category_id == category_id && run.variables == *variables)
        .collect();
    bests.sort_by(|a, b| {
        a.time_ms
            .cmp(&b.time_ms)
            .then_with(|| compare::chronological(a, b))
    });

    let mut rows = Vec::with_capacity(bests.len());
    let mut current_time = None;
    let mut rank = 0;
    for (i, run) in bests.iter().enumerate() {
        if current_time != Some(run.time_ms) {
            rank = i as u32 + 1;
            current_time = Some(run.time_ms);
        }
        rows.push(Row {
            rank,
            player_name: run.player_name.clone(),
            time_ms: run.time_ms,
            rta_ms: run.rta_ms(),
            video_url: run.video_url.clone(),
            run_id: run.id.clone(),
        });
    }
    rows
}
