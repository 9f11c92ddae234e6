use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::CHR_LENGTH;
use crate::helper::XoError;
use crate::helper::background::{CrossoverEvent, assign_background};
use crate::helper::io::{self, log_line};
use crate::helper::marker::{BlockRow, Marker, group_by_chromosome};
use crate::helper::report::{ChromosomeSummary, PeaksReport};
use crate::helper::segment::find_blocks;
use crate::pipelines::PipelineError;

// MARK: peaks

/// The `peaks` command: reads the marker table, segments each chromosome
/// into blocks around ancestry-switch peaks, assigns the background
/// genotype from the crossover table, and writes the block rows plus a
/// JSON run report. Chromosomes are processed in parallel; a failed
/// chromosome is reported and skipped without disturbing the others.
pub fn peaks(
    snps: &str,
    crossovers: Option<&str>,
    output: &str,
    max_block_size: usize,
    sample: Option<(&str, usize)>,
) -> Result<(), Box<dyn Error>> {
    let output_path = Path::new(output);
    let log_dir = output_path.parent().filter(|p| !p.as_os_str().is_empty());
    let logfile = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.unwrap_or(Path::new(".")).join("run_log.txt"))?;
    let mut logger = BufWriter::new(logfile);

    log_line(&mut logger, "Starting peaks pipeline")?;
    log_line(&mut logger, &format!("SNP file: {}", snps))?;
    log_line(&mut logger, &format!("Crossover file: {:?}", crossovers))?;
    log_line(&mut logger, &format!("Max block size: {}", max_block_size))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} Processing SNPs: {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("reading markers");

    // the sample takes the head of the raw input, before any sorting
    if let Some((sample_path, size)) = sample {
        spinner.set_message("saving sample");
        let markers = io::read_markers_raw(Path::new(snps))?;
        log_line(&mut logger, &format!("Read {} SNPs", markers.len()))?;
        let take = size.min(markers.len());
        io::write_markers(Path::new(sample_path), &markers[..take])?;
        log_line(
            &mut logger,
            &format!("Saved {} records to {}", take, sample_path),
        )?;
        spinner.finish_with_message(format!("saved {} records", take));
        return Ok(());
    }

    let markers = io::read_markers(Path::new(snps))?;
    log_line(&mut logger, &format!("Read {} SNPs", markers.len()))?;

    let crossover_groups = match crossovers {
        Some(path) => {
            let events = io::read_crossovers(Path::new(path))?;
            log_line(&mut logger, &format!("Read {} crossover events", events.len()))?;
            group_crossovers(events)
        }
        None => BTreeMap::new(),
    };

    spinner.set_message("finding blocks");

    let mut report = PeaksReport::new(snps, crossovers);

    let chromosomes: Vec<(String, Vec<Marker>)> = group_by_chromosome(markers).into_iter().collect();
    let total = chromosomes.len();

    let outcomes: Vec<Result<ChromosomeOutcome, (String, String)>> = chromosomes
        .par_iter()
        .map(|(chrom_id, chromosome_markers)| {
            let events = crossover_groups.get(chrom_id).map(|v| v.as_slice());
            process_chromosome(chrom_id, chromosome_markers, events, max_block_size)
                .map_err(|e| (chrom_id.clone(), e.to_string()))
        })
        .collect();

    let mut rows: Vec<BlockRow> = Vec::new();
    let mut failures: Vec<(String, String)> = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(outcome) => {
                if outcome.rows.is_empty() {
                    log_line(&mut logger, &format!("No blocks in {}", outcome.chrom_id))?;
                } else {
                    log_line(
                        &mut logger,
                        &format!(
                            "{}: {} SNPs, {} in blocks",
                            outcome.chrom_id,
                            outcome.marker_count,
                            outcome.rows.len()
                        ),
                    )?;
                }
                report.push_summary(ChromosomeSummary::new(
                    &outcome.chrom_id,
                    outcome.marker_count,
                    outcome.block_count,
                    outcome.rows.len(),
                ));
                rows.extend(outcome.rows);
            }
            Err((chrom_id, reason)) => {
                log_line(&mut logger, &format!("Failed {}: {}", chrom_id, reason))?;
                report.push_failure(&chrom_id, &reason);
                failures.push((chrom_id, reason));
            }
        }
    }

    spinner.set_message("writing output");
    io::write_block_rows(output_path, &rows)?;
    log_line(&mut logger, &format!("Wrote {} records to {}", rows.len(), output))?;

    report.set_process_end_time(Local::now());
    let report_path = log_dir.unwrap_or(Path::new(".")).join("peaks_report.json");
    fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;

    spinner.finish_with_message(format!("wrote {} records", rows.len()));

    if failures.is_empty() {
        log_line(&mut logger, "Peaks pipeline completed")?;
        Ok(())
    } else {
        let details = failures
            .iter()
            .map(|(chrom_id, reason)| format!("{}: {}", chrom_id, reason))
            .collect::<Vec<_>>()
            .join("; ");
        log_line(&mut logger, "Peaks pipeline completed with failures")?;
        Err(PipelineError::ChromosomesFailed {
            failed: failures.len(),
            total,
            details,
        }
        .into())
    }
}

// MARK: per-chromosome unit

#[derive(Debug)]
struct ChromosomeOutcome {
    chrom_id: String,
    marker_count: usize,
    block_count: usize,
    rows: Vec<BlockRow>,
}

fn process_chromosome(
    chrom_id: &str,
    markers: &[Marker],
    crossovers: Option<&[CrossoverEvent]>,
    max_block_size: usize,
) -> Result<ChromosomeOutcome, Box<dyn Error + Send + Sync>> {
    // an empty marker set is "no blocks", not an error
    let Some(first) = markers.first() else {
        return Ok(ChromosomeOutcome {
            chrom_id: chrom_id.to_string(),
            marker_count: 0,
            block_count: 0,
            rows: Vec::new(),
        });
    };
    let chr_length = *CHR_LENGTH
        .get(&first.chromosome)
        .ok_or(XoError::UnknownChromosome(first.chromosome))?;

    let blocks = find_blocks(markers, max_block_size);
    let background = assign_background(markers, crossovers);

    let mut rows = Vec::new();
    for block in &blocks {
        for i in block.start..=block.end {
            rows.push(BlockRow::from_marker(
                &markers[i],
                block.blk_id,
                &background[i],
                chr_length,
            ));
        }
    }

    Ok(ChromosomeOutcome {
        chrom_id: chrom_id.to_string(),
        marker_count: markers.len(),
        block_count: blocks.len(),
        rows,
    })
}

fn group_crossovers(events: Vec<CrossoverEvent>) -> BTreeMap<String, Vec<CrossoverEvent>> {
    let mut groups: BTreeMap<String, Vec<CrossoverEvent>> = BTreeMap::new();
    for event in events {
        groups.entry(event.chrom_id.clone()).or_default().push(event);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GENOTYPE_A, GENOTYPE_B};
    use crate::helper::marker::test_marker;

    fn chromosome_markers(chrom_id: &str, chromosome: u32, states: &[&str]) -> Vec<Marker> {
        states
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mut m = test_marker(chrom_id, 1000 * (i as u64 + 1), s);
                m.chromosome = chromosome;
                m
            })
            .collect()
    }

    #[test]
    fn test_process_chromosome_builds_rows() {
        let mut states = vec![GENOTYPE_A; 22];
        states.extend(vec![GENOTYPE_B; 6]);
        states.extend(vec![GENOTYPE_A; 22]);
        let markers = chromosome_markers("BSP-1-I", 1, &states);

        let outcome = process_chromosome("BSP-1-I", &markers, None, 1000).unwrap();
        assert_eq!(outcome.marker_count, 50);
        assert_eq!(outcome.block_count, 1);
        assert_eq!(outcome.rows.len(), 6);
        for row in &outcome.rows {
            assert_eq!(row.blk_id, 0);
            assert_eq!(row.hmm_state1, GENOTYPE_B);
            // majority background with no crossovers
            assert_eq!(row.background, GENOTYPE_A);
            assert!(row.location > 0.0);
        }
    }

    #[test]
    fn test_unknown_chromosome_is_reported() {
        let markers = chromosome_markers("BSP-9-I", 9, &[GENOTYPE_A; 10]);
        let err = process_chromosome("BSP-9-I", &markers, None, 1000).unwrap_err();
        assert!(err.to_string().contains("Unknown chromosome 9"));
    }

    #[test]
    fn test_empty_marker_set_yields_empty_outcome() {
        let outcome = process_chromosome("BSP-1-I", &[], None, 1000).unwrap();
        assert_eq!(outcome.marker_count, 0);
        assert_eq!(outcome.block_count, 0);
        assert!(outcome.rows.is_empty());
    }

    #[test]
    fn test_no_blocks_is_not_an_error() {
        let markers = chromosome_markers("BSP-1-I", 1, &[GENOTYPE_A; 10]);
        let outcome = process_chromosome("BSP-1-I", &markers, None, 1000).unwrap();
        assert_eq!(outcome.block_count, 0);
        assert!(outcome.rows.is_empty());
    }
}
