use std::error::Error;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use crate::helper::filters::{self, FilterCriteria};
use crate::helper::io::{self, log_line};

/// The `filter` command: applies the filter criteria to the peaks output
/// and writes the surviving block rows, plus the per-block summary table
/// when a summary path is given. An empty result is informational, not an
/// error.
pub fn filter(
    blocks: &str,
    output: &str,
    summary: Option<&str>,
    criteria: &FilterCriteria,
) -> Result<(), Box<dyn Error>> {
    let output_path = Path::new(output);
    let log_dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let logfile = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("run_log.txt"))?;
    let mut logger = BufWriter::new(logfile);

    log_line(&mut logger, "Starting filter pipeline")?;
    log_line(&mut logger, &format!("Blocks file: {}", blocks))?;

    let rows = io::read_block_rows(Path::new(blocks))?;
    log_line(&mut logger, &format!("Read {} block rows", rows.len()))?;

    let (filtered, summaries) = filters::apply(&rows, criteria);
    if summaries.is_empty() {
        log_line(&mut logger, "No blocks passed the filters")?;
    } else {
        log_line(
            &mut logger,
            &format!(
                "{} blocks ({} rows) passed the filters",
                summaries.len(),
                filtered.len()
            ),
        )?;
    }

    io::write_block_rows(output_path, &filtered)?;
    log_line(&mut logger, &format!("Wrote {} rows to {}", filtered.len(), output))?;

    if let Some(summary_path) = summary {
        io::write_summaries(Path::new(summary_path), &summaries)?;
        log_line(
            &mut logger,
            &format!("Wrote {} block summaries to {}", summaries.len(), summary_path),
        )?;
    }

    log_line(&mut logger, "Filter pipeline completed")?;
    Ok(())
}
