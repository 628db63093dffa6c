use anyhow::{Context, Result};
use qa_rank_core::ranking::ScoredGroup;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One recorded question group: ground-truth labels and predicted scores,
/// index-aligned over the candidates.
#[derive(Debug, Deserialize)]
struct RunGroup {
    labels: Vec<u32>,
    scores: Vec<f32>,
}

/// Loads a run file: one JSON group per line, blank lines skipped.
pub fn load_groups(path: &Path) -> Result<Vec<ScoredGroup>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open run file `{}`", path.display()))?;

    let mut groups = Vec::new();
    for (line_number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let group: RunGroup = serde_json::from_str(&line)
            .with_context(|| format!("Invalid group on line {}", line_number + 1))?;
        let group = ScoredGroup::new(group.labels, group.scores)
            .with_context(|| format!("Invalid group on line {}", line_number + 1))?;
        groups.push(group);
    }

    Ok(groups)
}
