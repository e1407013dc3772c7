use runs_lib::{leaderboard, models::Run, must, time::Time};

#[derive(clap::Args)]
pub struct LeaderboardCommand {
    /// The course ID.
    course_id: String,

    /// The star number.
    star: u8,
}

pub fn leaderboard(runs: &[Run], cmd: LeaderboardCommand) -> anyhow::Result<()> {
    let course = must::have_course(&cmd.course_id)?;
    let (category_id, variables) = must::have_star(&cmd.course_id, cmd.star)?;
    let rows = leaderboard::leaderboard(runs, &category_id, &variables);

    let mut table =
        prettytable::Table::init(vec![prettytable::row!["Rank", "Player", "IGT", "RTA", "Video"]]);

    for row in &rows {
        table.add_row(prettytable::row![
            row.rank,
            row.player_name,
            Time(row.time_ms),
            row.rta_ms.map(|ms| Time(ms).to_string()).unwrap_or_default(),
            row.video_url.as_deref().unwrap_or_default()
        ]);
    }

    println!("{}, star {} ({} players)", course.name, cmd.star, rows.len());
    println!("{table}");

    Ok(())
}
