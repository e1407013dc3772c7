use runs_lib::{key, models::Run, must, time::Time, timeline};

#[derive(clap::Args)]
pub struct ShowCommand {
    /// The run ID.
    run_id: String,
}

pub fn show(runs: &[Run], cmd: ShowCommand) -> anyhow::Result<()> {
    let run = must::have_run(runs, &cmd.run_id)?;

    println!("run `{}` by {} [{}]", run.id, run.player_name, run.status);
    println!("entry: {}", key::compare_key(run));
    println!("IGT: {}", Time(run.time_ms));
    match (run.rta_ms(), run.rta.as_deref()) {
        (Some(ms), _) => println!("RTA: {}", Time(ms)),
        (None, Some(raw)) => println!("RTA: {raw} (doesn't parse)"),
        (None, None) => (),
    }
    if let Some(date) = run.date_achieved {
        println!("achieved: {date}");
    }
    if let Some(at) = run.submitted_at {
        println!("submitted: {at}");
    }
    if let Some(url) = &run.video_url {
        println!("video: {url}");
    }

    let narrative = timeline::narrate_against(run, runs);
    println!();
    println!("[{}] {}", narrative.tag.label(), narrative.headline);
    for detail in &narrative.details {
        println!("  {detail}");
    }

    Ok(())
}
