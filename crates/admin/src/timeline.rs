use runs_lib::{models::Run, must, timeline};

#[derive(clap::Args)]
pub struct TimelineCommand {
    /// The course ID.
    course_id: String,

    /// The star number.
    star: u8,

    /// Print at most this many entries, oldest first, keeping the newest.
    #[arg(long, short = 'n')]
    limit: Option<usize>,
}

pub fn timeline(runs: &[Run], default_limit: usize, cmd: TimelineCommand) -> anyhow::Result<()> {
    let course = must::have_course(&cmd.course_id)?;
    let (category_id, variables) = must::have_star(&cmd.course_id, cmd.star)?;
    let entries = timeline::timeline(runs, &category_id, &variables);

    let limit = cmd.limit.unwrap_or(default_limit);
    let total = entries.len();
    let skipped = total.saturating_sub(limit);

    println!(
        "{}, star {}: {total} runs in the record history",
        course.name, cmd.star
    );
    if skipped > 0 {
        println!("(skipping the {skipped} oldest)");
    }
    println!();

    for entry in entries.iter().skip(skipped) {
        let date = entry
            .date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "(undated)".to_owned());
        println!("{date}  [{:>6}] {}", entry.narrative.tag.label(), entry.narrative.headline);
        for detail in &entry.narrative.details {
            println!("                      {detail}");
        }
    }

    Ok(())
}
