//! Drives a realistic archive through the whole moderation flow: submission,
//! approval planning, leaderboard assembly and timeline replay.

use chrono::NaiveDate;
use runs_lib::compare::RunTag;
use runs_lib::models::RunStatus;
use runs_lib::submit::Submission;
use runs_lib::{leaderboard, moderation, timeline};


#[test]
fn test_approval_supersedes_and_rewrites_the_boards() -> anyhow::Result<()> {
    // Brie holds the record, Alex sits behind her.
    let mut archive = vec![
        base::run("b1", "brie", 70_000, 1),
        base::run("a1", "alex", 75_000, 2),
    ];

    // Alex submits a new personal best that also takes the record.
    let submission = Submission {
        user_id: "alex".to_owned(),
        player_name: "Alex".to_owned(),
        course_id: base::COURSE.to_owned(),
        star: base::STAR,
        igt: "1'05\"00".to_owned(),
        rta: Some("1:08.500".to_owned()),
        date_achieved: Some("2024-03-04".to_owned()),
        video_url: None,
    };
    let submitted_at = NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let run = submission.into_run("a2".to_owned(), submitted_at)?;
    assert_eq!(run.time_ms, 65_000);
    assert_eq!(run.status, RunStatus::Pending);

    // While pending, the run is invisible to the leaderboard.
    archive.push(run.clone());
    let rows = leaderboard::leaderboard(&archive, base::COURSE, &base::star_variables());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].player_name, "Brie");

    // The plan covers exactly Alex's previous approved run.
    let plan = moderation::supersede_plan(&run, &archive);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].run.id, "a1");
    assert!(plan[0].improves);

    base::approve(&mut archive, "a2")?;

    // One approved run per personal-best key, nothing else to report.
    assert!(moderation::audit(&archive).is_clean());

    // The board now leads with Alex; the superseded run is gone from it.
    let rows = leaderboard::leaderboard(&archive, base::COURSE, &base::star_variables());
    let names: Vec<&str> = rows.iter().map(|row| row.player_name.as_str()).collect();
    assert_eq!(names, ["Alex", "Brie"]);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].rta_ms, Some(68_500));

    // The timeline still tells the whole story, superseded run included.
    let entries = timeline::timeline(&archive, base::COURSE, &base::star_variables());
    let ids: Vec<&str> = entries.iter().map(|entry| entry.run_id.as_str()).collect();
    assert_eq!(ids, ["b1", "a1", "a2"]);
    assert_eq!(entries[0].narrative.tag, RunTag::New);
    assert_eq!(entries[1].narrative.tag, RunTag::Run);
    assert_eq!(entries[2].narrative.tag, RunTag::RtAndIgt);

    // Brie's record fell to Alex's run; the narrative says by how much.
    assert!(entries[2].narrative.headline.contains("Alex"));
    assert!(entries[2].narrative.headline.contains("05\"00"));
    assert!(entries[2].narrative.details[0].contains("Brie"));

    Ok(())
}

#[test]
fn test_rejected_runs_never_reach_any_surface() -> anyhow::Result<()> {
    let mut archive = vec![base::run("b1", "brie", 70_000, 1)];
    let mut cheated = base::run("m1", "mallory", 1_000, 2);
    cheated.status = RunStatus::Pending;
    archive.push(cheated);

    // The moderator rejects it; the lifecycle forbids bringing it back.
    moderation::ensure_transition(RunStatus::Pending, RunStatus::Rejected)?;
    archive[1].status = RunStatus::Rejected;
    assert!(moderation::ensure_transition(RunStatus::Rejected, RunStatus::Approved).is_err());

    let rows = leaderboard::leaderboard(&archive, base::COURSE, &base::star_variables());
    assert_eq!(rows.len(), 1);

    let entries = timeline::timeline(&archive, base::COURSE, &base::star_variables());
    assert_eq!(entries.len(), 1);
    assert!(moderation::audit(&archive).is_clean());

    Ok(())
}

#[test]
fn test_approving_a_slower_run_flags_the_plan() {
    let archive = vec![base::run("b1", "brie", 70_000, 1)];
    let mut slower = base::run("b2", "brie", 72_000, 3);
    slower.status = RunStatus::Pending;

    // A data fix can approve a slower run; the plan warns about it.
    let plan = moderation::supersede_plan(&slower, &archive);
    assert_eq!(plan.len(), 1);
    assert!(!plan[0].improves);
}
