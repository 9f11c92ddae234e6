use std::collections::BTreeMap;

use getset::Getters;
use itertools::Itertools;
use itertools::MinMaxResult;
use regex::Regex;
use serde::Serialize;

use crate::config;
use crate::helper::error::XoError;
use crate::helper::marker::BlockRow;

// MARK: FilterCriteria

/// Immutable filter configuration, built once per invocation. The
/// chromosome pattern is anchored at the start of the name, matching the
/// original prefix-match behavior.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    chromosome: Regex,
    size_range: (u64, u64),
    length_range: (u64, u64),
    coverage: u32,
    matched: bool,
}

impl FilterCriteria {
    pub fn new(
        pattern: &str,
        size_range: (u64, u64),
        length_range: (u64, u64),
        coverage: u32,
        matched: bool,
    ) -> Result<Self, XoError> {
        let chromosome = Regex::new(&format!("^(?:{})", pattern))
            .map_err(|e| XoError::InvalidChromosomePattern(pattern.to_string(), e.to_string()))?;
        if size_range.0 > size_range.1 {
            return Err(XoError::InvalidRange(size_range.0, size_range.1));
        }
        if length_range.0 > length_range.1 {
            return Err(XoError::InvalidRange(length_range.0, length_range.1));
        }
        Ok(FilterCriteria {
            chromosome,
            size_range,
            length_range,
            coverage,
            matched,
        })
    }

    /// Row-level test for Stage 1: chromosome pattern, genotype match,
    /// coverage. Coverage uses a strict `>` comparison, so a marker whose
    /// total read depth equals the threshold is excluded.
    fn keep_row(&self, row: &BlockRow) -> bool {
        if !self.chromosome.is_match(&row.chrom_id) {
            return false;
        }
        if self.matched && row.base_geno != row.hmm_state1 {
            return false;
        }
        if self.coverage > 0 && row.coverage() <= self.coverage {
            return false;
        }
        true
    }

    fn keep_summary(&self, summary: &BlockSummary) -> bool {
        summary.blk_size >= self.size_range.0
            && summary.blk_size <= self.size_range.1
            && summary.blk_len >= self.length_range.0
            && summary.blk_len <= self.length_range.1
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria::new(
            config::DEFAULT_CHROMOSOME_PATTERN,
            config::DEFAULT_BLOCK_SIZE_RANGE,
            config::DEFAULT_BLOCK_LENGTH_RANGE,
            config::DEFAULT_COVERAGE,
            false,
        )
        .expect("default filter criteria are valid")
    }
}

// MARK: BlockSummary

/// Aggregate statistics of one filtered block: marker count, span in base
/// pairs between the first and last marker, and mean relative location.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct BlockSummary {
    #[getset(get = "pub")]
    chrom_id: String,
    #[getset(get = "pub")]
    blk_id: u32,
    #[getset(get = "pub")]
    background: String,
    #[getset(get = "pub")]
    blk_size: u64,
    #[getset(get = "pub")]
    blk_len: u64,
    #[getset(get = "pub")]
    blk_loc: f64,
}

impl BlockSummary {
    fn from_group(chrom_id: &str, blk_id: u32, rows: &[&BlockRow]) -> Self {
        let blk_len = match rows.iter().map(|r| r.position).minmax() {
            MinMaxResult::NoElements => 0,
            MinMaxResult::OneElement(_) => 0,
            MinMaxResult::MinMax(min, max) => max - min,
        };
        let blk_loc = rows.iter().map(|r| r.location).sum::<f64>() / rows.len() as f64;
        BlockSummary {
            chrom_id: chrom_id.to_string(),
            blk_id,
            background: rows[0].background.clone(),
            blk_size: rows.len() as u64,
            blk_len,
            blk_loc,
        }
    }
}

// MARK: apply

/// Applies the three filter stages and returns the surviving rows plus
/// one summary per surviving block.
///
/// Stage 1 narrows the row set (chromosome pattern, genotype match,
/// coverage); Stage 2 groups the survivors by (chromosome, block id) in
/// sorted key order; Stage 3 keeps only groups whose size and length fall
/// inside the inclusive criteria ranges. The returned rows are exactly
/// the Stage-1 survivors of the groups retained in Stage 3, so applying
/// the same criteria to the output reproduces it.
pub fn apply(rows: &[BlockRow], criteria: &FilterCriteria) -> (Vec<BlockRow>, Vec<BlockSummary>) {
    let mut groups: BTreeMap<(String, u32), Vec<&BlockRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| criteria.keep_row(r)) {
        groups
            .entry((row.chrom_id.clone(), row.blk_id))
            .or_default()
            .push(row);
    }

    let mut filtered = Vec::new();
    let mut summaries = Vec::new();
    for ((chrom_id, blk_id), group) in &groups {
        let summary = BlockSummary::from_group(chrom_id, *blk_id, group);
        if criteria.keep_summary(&summary) {
            filtered.extend(group.iter().map(|r| (*r).clone()));
            summaries.push(summary);
        }
    }

    (filtered, summaries)
}
