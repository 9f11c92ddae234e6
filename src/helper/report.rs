use chrono::{DateTime, Local};
use getset::{Getters, Setters};
use serde::{Deserialize, Serialize};

// MARK: PeaksReport

/// Run report written as JSON next to the peaks output: what was read,
/// what each chromosome produced, and which chromosomes failed.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, Setters)]
pub struct PeaksReport {
    #[getset(get = "pub", set = "pub")]
    process_start_time: DateTime<Local>,
    #[getset(get = "pub", set = "pub")]
    process_end_time: DateTime<Local>,
    #[getset(get = "pub", set = "pub")]
    current_version: String,
    #[getset(get = "pub", set = "pub")]
    snps_file: String,
    #[getset(get = "pub", set = "pub")]
    crossovers_file: Option<String>,
    #[getset(get = "pub", set = "pub")]
    chromosome_summaries: Vec<ChromosomeSummary>,
    #[getset(get = "pub", set = "pub")]
    failures: Vec<ChromosomeFailure>,
}

impl PeaksReport {
    pub fn new(snps_file: &str, crossovers_file: Option<&str>) -> Self {
        PeaksReport {
            process_start_time: Local::now(),
            process_end_time: Local::now(),
            current_version: env!("CARGO_PKG_VERSION").to_string(),
            snps_file: snps_file.to_string(),
            crossovers_file: crossovers_file.map(str::to_string),
            chromosome_summaries: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, summary: ChromosomeSummary) {
        self.chromosome_summaries.push(summary);
    }

    pub fn push_failure(&mut self, chrom_id: &str, reason: &str) {
        self.failures.push(ChromosomeFailure {
            chrom_id: chrom_id.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Per-chromosome outcome of the peaks stage.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct ChromosomeSummary {
    #[getset(get = "pub")]
    chrom_id: String,
    #[getset(get = "pub")]
    marker_count: usize,
    #[getset(get = "pub")]
    block_count: usize,
    #[getset(get = "pub")]
    markers_in_blocks: usize,
}

impl ChromosomeSummary {
    pub fn new(
        chrom_id: &str,
        marker_count: usize,
        block_count: usize,
        markers_in_blocks: usize,
    ) -> Self {
        ChromosomeSummary {
            chrom_id: chrom_id.to_string(),
            marker_count,
            block_count,
            markers_in_blocks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct ChromosomeFailure {
    #[getset(get = "pub")]
    chrom_id: String,
    #[getset(get = "pub")]
    reason: String,
}
