use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueHint};
use mkenv::prelude::*;

mod archive;
mod audit;
mod export;
mod leaderboard;
mod plan;
mod show;
mod timeline;

#[derive(clap::Parser)]
struct Args {
    /// The path to the JSON archive, overriding the environment.
    #[arg(long, value_hint = ValueHint::FilePath)]
    archive: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the leaderboard of a star.
    Leaderboard(leaderboard::LeaderboardCommand),
    /// Replay the record history of a star.
    Timeline(timeline::TimelineCommand),
    /// Show one run and its place in the record history.
    Show(show::ShowCommand),
    /// Preview what approving a pending run would do.
    Plan(plan::PlanCommand),
    /// Check the archive for moderation drift.
    Audit,
    /// Export the leaderboard of a star as CSV.
    Export(export::ExportCommand),
}

mkenv::make_config! {
    /// The environment used by the admin CLI.
    struct Env {
        /// The path to the JSON archive of runs.
        archive: {
            var_name: "STARBOARD_ARCHIVE",
            layers: [
                or_default_val(|| "runs.json".to_owned()),
            ],
            description: "The path to the JSON archive of runs exported from the store",
            default_val_fmt: "runs.json",
        },
        /// The default amount of timeline entries printed.
        timeline_limit: {
            var_name: "STARBOARD_TIMELINE_LIMIT",
            layers: [
                parsed_from_str<usize>(),
                or_default_val(|| 50),
            ],
            description: "The default amount of timeline entries printed by the timeline command",
            default_val_fmt: "50",
        },
    }
}

fn main() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err).context("cannot retrieve .env files"),
        _ => (),
    }
    tracing_subscriber::fmt()
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("unable to init tracing_subscriber: {e}"))?;
    let env = Env::define();
    env.init();

    let args = Args::parse();
    let path = args
        .archive
        .unwrap_or_else(|| PathBuf::from(env.archive.get()));
    let runs = archive::load(path)?;

    match args.command {
        Command::Leaderboard(cmd) => leaderboard::leaderboard(&runs, cmd),
        Command::Timeline(cmd) => timeline::timeline(&runs, env.timeline_limit.get(), cmd),
        Command::Show(cmd) => show::show(&runs, cmd),
        Command::Plan(cmd) => plan::plan(&runs, cmd),
        Command::Audit => audit::audit(&runs),
        Command::Export(cmd) => export::export(&runs, cmd),
    }
}
