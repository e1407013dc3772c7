use runs_lib::{
    compare,
    models::{Run, RunStatus},
    moderation, must,
    time::Time,
    timeline,
};

#[derive(clap::Args)]
pub struct PlanCommand {
    /// The ID of the pending run to preview the approval of.
    run_id: String,
}

pub fn plan(runs: &[Run], cmd: PlanCommand) -> anyhow::Result<()> {
    let target = must::have_run(runs, &cmd.run_id)?;
    moderation::ensure_transition(target.status, RunStatus::Approved)?;

    // An approval narrates against the runs that are approved right now.
    let priors: Vec<&Run> = compare::select_prior_runs(target, runs)
        .into_iter()
        .filter(|run| run.status == RunStatus::Approved)
        .collect();
    let narrative = timeline::narrate(target, &priors);

    println!("approving `{}` would publish:", target.id);
    println!("[{}] {}", narrative.tag.label(), narrative.headline);
    for detail in &narrative.details {
        println!("  {detail}");
    }
    println!();

    let plan = moderation::supersede_plan(target, runs);
    if plan.is_empty() {
        println!("no approved run shares this personal best, nothing to supersede");
        return Ok(());
    }

    let mut table =
        prettytable::Table::init(vec![prettytable::row!["Run", "Player", "IGT", "Improves"]]);
    for planned in &plan {
        table.add_row(prettytable::row![
            planned.run.id,
            planned.run.player_name,
            Time(planned.run.time_ms),
            if planned.improves { "yes" } else { "NO" }
        ]);
    }

    println!("these approved runs would flip to obsolete:");
    println!("{table}");

    Ok(())
}
