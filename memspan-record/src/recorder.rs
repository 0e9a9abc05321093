//! Append-only CSV record of completed runs.
//!
//! One row per trial; the header is written once for the file's lifetime.
//! Run-level aggregates repeat on every row on purpose: downstream
//! consumers read per-row and never join against a separate summary table.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use memspan_core::{RunSummary, TaskError};
use memspan_task::RunStats;

/// Column order of the persisted table.
pub const COLUMNS: [&str; 10] = [
    "Index Run",
    "Index Task",
    "Shown Number",
    "Probe Number",
    "User Answer",
    "Correct Answer",
    "Accuracy Rate",
    "Mean Response Time",
    "Median Response Time",
    "Standard Deviation",
];

#[derive(Debug, Clone)]
pub struct RunRecorder {
    path: PathBuf,
}

impl RunRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next run index: one past the highest index already recorded.
    ///
    /// Derived from the run-index column itself rather than by counting
    /// header markers, so a partially copied or hand-edited file still
    /// yields a sane index.
    pub fn next_run_index(&self) -> Result<u32, TaskError> {
        if !self.path.exists() {
            return Ok(1);
        }
        let contents = fs::read_to_string(&self.path)?;
        let mut highest = 0u32;
        for line in contents.lines() {
            if let Some(first) = line.split(',').next() {
                if let Ok(index) = first.trim().parse::<u32>() {
                    highest = highest.max(index);
                }
            }
        }
        Ok(highest + 1)
    }

    /// Appends one run as `trial_count` rows and returns the run index
    /// used. Never rewrites existing rows.
    pub fn append(&self, summary: &RunSummary, stats: &RunStats) -> Result<u32, TaskError> {
        let run_index = self.next_run_index()?;

        let mut block = String::new();
        if self.destination_is_empty()? {
            block.push_str(&COLUMNS.join(","));
            block.push('\n');
        }
        for (i, outcome) in summary.outcomes.iter().enumerate() {
            let row = [
                run_index.to_string(),
                (i + 1).to_string(),
                escape_csv(&outcome.set.items().join(" ")),
                escape_csv(&outcome.probe),
                yes_no(outcome.response).to_string(),
                yes_no(outcome.probe_is_member).to_string(),
                format!("{:.2}", stats.accuracy),
                format!("{:.4}", stats.latency.mean),
                format!("{:.4}", stats.latency.median),
                format!("{:.4}", stats.latency.std_dev),
            ]
            .join(",");
            block.push_str(&row);
            block.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(block.as_bytes())?;
        Ok(run_index)
    }

    fn destination_is_empty(&self) -> Result<bool, TaskError> {
        if !self.path.exists() {
            return Ok(true);
        }
        Ok(fs::metadata(&self.path)?.len() == 0)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_only_when_needed() {
        assert_eq!(escape_csv("12 34 56"), "12 34 56");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
