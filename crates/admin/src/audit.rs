use runs_lib::{models::Run, moderation};

pub fn audit(runs: &[Run]) -> anyhow::Result<()> {
    let report = moderation::audit(runs);

    if report.is_clean() {
        println!("the archive is clean ({} runs)", runs.len());
        return Ok(());
    }

    if !report.duplicate_approved.is_empty() {
        let mut table =
            prettytable::Table::init(vec![prettytable::row!["PB key", "Approved runs"]]);
        for (pb_key, ids) in &report.duplicate_approved {
            table.add_row(prettytable::row![pb_key, ids.join(", ")]);
        }
        println!("personal-best keys holding more than one approved run:");
        println!("{table}");
    }

    if !report.unknown_entries.is_empty() {
        println!(
            "approved runs outside the catalog: {}",
            report.unknown_entries.join(", ")
        );
    }

    anyhow::bail!("the archive audit reported problems")
}
