//! Run submission: turning the raw form input of a runner into a pending [`Run`].
//!
//! Everything a runner types is text; this is where that text either becomes a
//! well-formed run or gets bounced back with an error they can act on. The caller
//! supplies the store id and the submission instant, so the conversion stays
//! pure.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{RunsError, RunsResult};
use crate::models::{self, Run, RunStatus};
use crate::must;
use crate::time;

/// A raw run submission, as typed in the submission form.
#[derive(Deserialize, Clone, Debug)]
pub struct Submission {
    /// The id of the submitting account.
    pub user_id: String,
    /// The display name of the player.
    pub player_name: String,
    /// The id of the course the run was played on.
    pub course_id: String,
    /// The star number within the course, from 1.
    pub star: u8,
    /// The in-game time, as typed. Star timer marks like `1'23"45` are fine.
    pub igt: String,
    /// The real-time attack, as typed, if any.
    #[serde(default)]
    pub rta: Option<String>,
    /// The date the run was achieved, as typed, if any.
    #[serde(default)]
    pub date_achieved: Option<String>,
    /// A link to a recording, if any.
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Submission {
    /// Converts the submission into a pending run.
    ///
    /// The in-game time must parse; the catalog must know the course and star;
    /// the player name must not be blank. The RTA is kept verbatim (minus the
    /// `-` placeholder) and only parsed on demand later, and a malformed
    /// achieved date degrades to `None` rather than blocking the submission.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, submitted_at), fields(player = %self.player_name), err)
    )]
    pub fn into_run(self, id: String, submitted_at: NaiveDateTime) -> RunsResult<Run> {
        let player_name = self.player_name.trim().to_owned();
        if player_name.is_empty() {
            return Err(RunsError::EmptyPlayerName);
        }

        let (category_id, variables) = must::have_star(&self.course_id, self.star)?;
        let time_ms = time::parse_igt(&self.igt)?;

        Ok(Run {
            id,
            user_id: self.user_id,
            player_name,
            category_id,
            variables,
            time_ms,
            rta: models::normalize_rta(self.rta),
            date_achieved: self
                .date_achieved
                .as_deref()
                .and_then(models::parse_achieved_date),
            submitted_at: Some(submitted_at),
            status: RunStatus::Pending,
            video_url: self.video_url.filter(|url| !url.trim().is_empty()),
        })
    }
}
