use std::fs;
use std::path::Path;

use anyhow::Context as _;
use runs_lib::models::Run;

/// Loads the JSON archive the store exported.
///
/// Runs that fail validation are skipped with a warning instead of failing the
/// whole command; a moderator wants to see the archive even when one hand edit
/// went wrong.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Vec<Run>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("couldn't read the archive at `{}`", path.display()))?;
    let runs: Vec<Run> = serde_json::from_str(&raw)
        .with_context(|| format!("couldn't parse the archive at `{}`", path.display()))?;

    let mut valid = Vec::with_capacity(runs.len());
    for run in runs {
        match run.validate() {
            Ok(()) => valid.push(run),
            Err(err) => tracing::warn!("skipping run `{}`: {err}", run.id),
        }
    }

    tracing::info!("loaded {} runs from `{}`", valid.len(), path.display());
    Ok(valid)
}
