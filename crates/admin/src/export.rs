use std::io;
use std::path::PathBuf;

use anyhow::Context as _;
use runs_lib::{
    leaderboard::{self, Row},
    models::Run,
    must,
};

#[derive(clap::Args)]
pub struct ExportCommand {
    /// The course ID.
    course_id: String,

    /// The star number.
    star: u8,

    /// Write to this file instead of stdout.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn export(runs: &[Run], cmd: ExportCommand) -> anyhow::Result<()> {
    let (category_id, variables) = must::have_star(&cmd.course_id, cmd.star)?;
    let rows = leaderboard::leaderboard(runs, &category_id, &variables);

    match cmd.output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("couldn't write to `{}`", path.display()))?;
            write_rows(&mut writer, &rows)?;
            writer.flush()?;
            tracing::info!("wrote {} rows to `{}`", rows.len(), path.display());
        }
        None => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            write_rows(&mut writer, &rows)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn write_rows<W: io::Write>(writer: &mut csv::Writer<W>, rows: &[Row]) -> anyhow::Result<()> {
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(())
}
