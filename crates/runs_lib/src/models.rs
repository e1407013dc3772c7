//! This module contains the definition of the models stored in the run archive.
//!
//! The shapes mirror the rows exported by the hosted submission backend. Everything
//! messy about that export (unknown statuses, the `-` placeholder for a missing RTA,
//! half-formed achieved dates) is normalized once in the serde layer, so the rest of
//! the crate only ever sees well-formed values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RunsError, RunsResult};

/// The moderation status of a run.
///
/// A run enters the archive as [`Pending`][RunStatus::Pending], and from there a
/// moderator either approves or rejects it. An approved run may later become
/// [`Obsolete`][RunStatus::Obsolete] when the same player submits a better time for
/// the same entry. See [`can_transition`](RunStatus::can_transition) for the allowed
/// moves.
#[derive(Serialize, Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Waiting for a moderator decision. Invisible to leaderboards.
    #[default]
    Pending,
    /// Counts for leaderboards and record history.
    Approved,
    /// Refused by a moderator. Never counts anywhere.
    Rejected,
    /// Superseded by a better approved run with the same personal-best key.
    /// Still counts for record history.
    Obsolete,
}

impl RunStatus {
    /// Parses a status label coming from the store.
    ///
    /// Anything unrecognized maps to [`Pending`][RunStatus::Pending], so a row with a
    /// garbled status is withheld from leaderboards rather than dropped or trusted.
    pub fn from_store(label: &str) -> Self {
        match label.trim() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "obsolete" => Self::Obsolete,
            _ => Self::Pending,
        }
    }

    /// Returns the lowercase label of this status, as stored in the archive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Obsolete => "obsolete",
        }
    }

    /// Whether a run with this status was approved at some point of its life.
    ///
    /// Record history replays count these runs, so a superseded record holder still
    /// appears in the story of an entry.
    pub fn was_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::Obsolete)
    }

    /// Whether the moderation lifecycle allows moving a run from this status to
    /// `to`.
    ///
    /// A pending run can be approved, rejected or directly marked obsolete (the
    /// store does the latter when approving a better run of the same player in
    /// one batch). An approved run can only become obsolete. Rejected and
    /// obsolete are final.
    pub fn can_transition(self, to: RunStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved | Self::Rejected | Self::Obsolete)
                | (Self::Approved, Self::Obsolete)
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_store(s))
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_store(&label))
    }
}

/// A single submitted run, the central model of the archive.
///
/// The in-game time ([`time_ms`][Run::time_ms]) is the primary competitive metric.
/// The real-time attack ([`rta`][Run::rta]) is free text typed by the runner and is
/// only compared when it parses as a time.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Run {
    /// The opaque store id of the run. Ids are unique, and their lexicographic
    /// order breaks chronological ties.
    pub id: String,
    /// The id of the account that submitted the run.
    pub user_id: String,
    /// The display name of the player, as typed at submission time.
    pub player_name: String,
    /// The id of the category the run belongs to. For regular star runs this is
    /// the course id.
    pub category_id: String,
    /// The category variables of the run, for example which star of the course.
    ///
    /// The map keeps its keys sorted, so two runs with the same variables always
    /// produce the same comparison key.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// The in-game time of the run, in milliseconds.
    pub time_ms: i64,
    /// The real-time attack of the run, as typed by the runner.
    ///
    /// The store uses `-` as a placeholder for "not provided"; the serde layer maps
    /// it (and blank strings) to `None`, and writes `-` back on export.
    #[serde(default, serialize_with = "ser_rta", deserialize_with = "de_rta")]
    pub rta: Option<String>,
    /// The date the run was achieved, when the runner provided one.
    #[serde(default, deserialize_with = "de_achieved_date")]
    pub date_achieved: Option<NaiveDate>,
    /// The instant the run was submitted to the backend, in UTC.
    #[serde(default, deserialize_with = "de_submitted_at")]
    pub submitted_at: Option<NaiveDateTime>,
    /// The moderation status of the run.
    #[serde(default)]
    pub status: RunStatus,
    /// A link to a recording of the run, if any.
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Run {
    /// Whether both runs belong to the same entry, meaning the same category with
    /// the same variables. Only runs of the same entry are ever compared.
    pub fn same_entry(&self, other: &Run) -> bool {
        self.category_id == other.category_id && self.variables == other.variables
    }

    /// The millisecond timestamp used for chronological ordering.
    ///
    /// Prefers the submission instant, falls back to midnight UTC of the achieved
    /// date, and defaults to 0 when the run has neither. The ordering stays total
    /// either way; undated runs simply sort first.
    pub fn sort_ms(&self) -> i64 {
        self.submitted_at
            .map(|at| at.and_utc().timestamp_millis())
            .or_else(|| {
                self.date_achieved
                    .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
            })
            .unwrap_or_default()
    }

    /// The millisecond timestamp used when narrating how long a record stood.
    ///
    /// This is the opposite fallback of [`sort_ms`][Run::sort_ms]: the date the
    /// runner claims wins over the submission instant, because a run played weeks
    /// before it was submitted should count from when it was played.
    pub fn effective_date_ms(&self) -> Option<i64> {
        self.date_achieved
            .map(|date| date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
            .or_else(|| self.submitted_at.map(|at| at.and_utc().timestamp_millis()))
    }

    /// The calendar date shown next to the run, with the same preference as
    /// [`effective_date_ms`][Run::effective_date_ms].
    pub fn display_date(&self) -> Option<NaiveDate> {
        self.date_achieved.or_else(|| self.submitted_at.map(|at| at.date()))
    }

    /// The real-time attack in milliseconds, when the text parses as a time.
    pub fn rta_ms(&self) -> Option<i64> {
        self.rta
            .as_deref()
            .and_then(|text| crate::time::parse_time(text).ok())
    }

    /// Checks the fields no archive row is allowed to get wrong.
    pub fn validate(&self) -> RunsResult {
        if self.time_ms < 0 {
            return Err(RunsError::NegativeTime(self.time_ms));
        }
        if self.player_name.trim().is_empty() {
            return Err(RunsError::EmptyPlayerName);
        }
        Ok(())
    }
}

/// Maps the store placeholder for a missing RTA to `None`.
///
/// The hosted backend stores `-` when the runner left the field empty, and some
/// old rows contain blank strings.
pub fn normalize_rta(text: Option<String>) -> Option<String> {
    text.filter(|s| {
        let trimmed = s.trim();
        !trimmed.is_empty() && trimmed != "-"
    })
}

/// Parses an achieved date from the store, leniently.
///
/// Old rows mix plain dates, RFC 3339 timestamps and space-separated timestamps.
/// Anything else comes back as `None`; a run without a readable date still orders
/// fine through its submission instant.
pub fn parse_achieved_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|at| at.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|at| at.date())
        })
}

/// Parses a submission instant from the store, leniently.
///
/// Accepts RFC 3339 (converted to UTC) and naive timestamps with either a `T` or a
/// space separator.
pub fn parse_submitted_at(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|at| at.naive_utc())
        .or_else(|| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f").ok())
}

fn ser_rta<S: serde::Serializer>(rta: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(rta.as_deref().unwrap_or("-"))
}

fn de_rta<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_rta(raw))
}

fn de_achieved_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_achieved_date))
}

fn de_submitted_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_submitted_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_from_store_maps_unknown_labels_to_pending() {
        assert_eq!(RunStatus::from_store("approved"), RunStatus::Approved);
        assert_eq!(RunStatus::from_store("rejected"), RunStatus::Rejected);
        assert_eq!(RunStatus::from_store("obsolete"), RunStatus::Obsolete);
        assert_eq!(RunStatus::from_store("verified"), RunStatus::Pending);
        assert_eq!(RunStatus::from_store(""), RunStatus::Pending);
    }

    #[test]
    fn run_deserialization_normalizes_store_quirks() {
        let run: Run = serde_json::from_str(
            r#"{
                "id": "r42",
                "user_id": "u1",
                "player_name": "Alex",
                "category_id": "frosted-hollow",
                "variables": { "star": "3" },
                "time_ms": 83450,
                "rta": "-",
                "date_achieved": "2024-03-12T08:30:00+01:00",
                "submitted_at": "2024-03-12T10:00:00Z",
                "status": "checked"
            }"#,
        )
        .unwrap();

        assert_eq!(run.rta, None);
        assert_eq!(run.date_achieved, Some(date(2024, 3, 12)));
        assert_eq!(
            run.submitted_at,
            Some(date(2024, 3, 12).and_hms_opt(10, 0, 0).unwrap())
        );
        assert_eq!(run.status, RunStatus::Pending);
        assert_eq!(run.video_url, None);
    }

    #[test]
    fn run_serialization_writes_the_rta_placeholder_back() {
        let run = Run {
            id: "r1".to_owned(),
            user_id: "u1".to_owned(),
            player_name: "Alex".to_owned(),
            category_id: "frosted-hollow".to_owned(),
            variables: BTreeMap::new(),
            time_ms: 65000,
            rta: None,
            date_achieved: None,
            submitted_at: None,
            status: RunStatus::Approved,
            video_url: None,
        };

        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["rta"], "-");
        assert_eq!(json["status"], "approved");
    }

    #[test]
    fn sort_ms_prefers_the_submission_instant() {
        let mut run = Run {
            id: "r1".to_owned(),
            user_id: "u1".to_owned(),
            player_name: "Alex".to_owned(),
            category_id: "c".to_owned(),
            variables: BTreeMap::new(),
            time_ms: 1000,
            rta: None,
            date_achieved: Some(date(2024, 3, 10)),
            submitted_at: Some(date(2024, 3, 12).and_hms_opt(10, 0, 0).unwrap()),
            status: RunStatus::Approved,
            video_url: None,
        };

        let submitted = run.submitted_at.unwrap().and_utc().timestamp_millis();
        assert_eq!(run.sort_ms(), submitted);

        run.submitted_at = None;
        let achieved_midnight = date(2024, 3, 10)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        assert_eq!(run.sort_ms(), achieved_midnight);

        run.date_achieved = None;
        assert_eq!(run.sort_ms(), 0);
    }

    #[test]
    fn effective_date_prefers_the_achieved_date() {
        let run = Run {
            id: "r1".to_owned(),
            user_id: "u1".to_owned(),
            player_name: "Alex".to_owned(),
            category_id: "c".to_owned(),
            variables: BTreeMap::new(),
            time_ms: 1000,
            rta: None,
            date_achieved: Some(date(2024, 3, 10)),
            submitted_at: Some(date(2024, 3, 12).and_hms_opt(10, 0, 0).unwrap()),
            status: RunStatus::Approved,
            video_url: None,
        };

        let achieved_midnight = date(2024, 3, 10)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        assert_eq!(run.effective_date_ms(), Some(achieved_midnight));
        assert_eq!(run.display_date(), Some(date(2024, 3, 10)));
    }

    #[test]
    fn lenient_date_parsing_accepts_the_store_formats() {
        assert_eq!(parse_achieved_date("2024-03-12"), Some(date(2024, 3, 12)));
        assert_eq!(
            parse_achieved_date("2024-03-12T23:59:00-05:00"),
            Some(date(2024, 3, 12))
        );
        assert_eq!(
            parse_achieved_date("2024-03-12 08:30:00"),
            Some(date(2024, 3, 12))
        );
        assert_eq!(parse_achieved_date("12/03/2024"), None);
        assert_eq!(parse_achieved_date(""), None);
    }

    #[test]
    fn validate_rejects_negative_times_and_blank_names() {
        let mut run = Run {
            id: "r1".to_owned(),
            user_id: "u1".to_owned(),
            player_name: "Alex".to_owned(),
            category_id: "c".to_owned(),
            variables: BTreeMap::new(),
            time_ms: -1,
            rta: None,
            date_achieved: None,
            submitted_at: None,
            status: RunStatus::Pending,
            video_url: None,
        };

        assert_eq!(run.validate(), Err(RunsError::NegativeTime(-1)));
        run.time_ms = 0;
        run.player_name = "   ".to_owned();
        assert_eq!(run.validate(), Err(RunsError::EmptyPlayerName));
        run.player_name = "Alex".to_owned();
        assert_eq!(run.validate(), Ok(()));
    }
}
