use std::error::Error;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use rayon::prelude::*;

use crate::helper::io::{self, log_line};
use crate::helper::marker::{BlockRow, NcoRow, group_by_block};
use crate::helper::scan::{NCO_RUN, NCO_SELECTED, RunScanConfig, scan};

/// The `post` command: scans each filtered block for its most likely NCO
/// interval and writes the rows back with the appended classification
/// column. Blocks are scanned in parallel; output order is (chromosome,
/// block id).
pub fn post(blocks: &str, output: &str, config: &RunScanConfig) -> Result<(), Box<dyn Error>> {
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

    log_line(&mut logger, "Starting post pipeline")?;
    log_line(&mut logger, &format!("Blocks file: {}", blocks))?;

    let rows = io::read_block_rows(Path::new(blocks))?;
    log_line(&mut logger, &format!("Read {} block rows", rows.len()))?;

    let groups: Vec<((String, u32), Vec<BlockRow>)> = group_by_block(rows).into_iter().collect();
    let block_count = groups.len();

    let classified: Vec<Vec<NcoRow>> = groups
        .par_iter()
        .map(|(_, block_rows)| {
            let classification = scan(block_rows, config);
            block_rows
                .iter()
                .zip(classification)
                .map(|(row, nco)| NcoRow::from_block_row(row, nco))
                .collect()
        })
        .collect();

    let rows: Vec<NcoRow> = classified.into_iter().flatten().collect();
    io::write_nco_rows(output_path, &rows)?;
    log_line(&mut logger, &format!("Wrote {} rows to {}", rows.len(), output))?;

    print_summary(&rows, block_count);
    log_line(&mut logger, "Post pipeline completed")?;
    Ok(())
}

/// Console summary of the classification results.
fn print_summary(rows: &[NcoRow], block_count: usize) {
    let selected = rows.iter().filter(|r| r.nco == NCO_SELECTED).count();
    let in_runs = rows.iter().filter(|r| r.nco == NCO_RUN).count();
    let blocks_with_nco = {
        let mut ids: Vec<(&str, u32)> = rows
            .iter()
            .filter(|r| r.nco == NCO_SELECTED)
            .map(|r| (r.chrom_id.as_str(), r.blk_id))
            .collect();
        ids.dedup();
        ids.len()
    };

    println!("Blocks scanned:        {}", block_count);
    println!("Blocks with an NCO:    {}", blocks_with_nco);
    println!("Markers in NCOs:       {}", selected);
    println!("Markers in other runs: {}", in_runs);
}
