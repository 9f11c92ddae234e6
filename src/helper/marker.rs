use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// MARK: Marker

/// One genotyped position from the marker table. Rows are keyed by
/// `chrom_id` (the sample-level chromosome name, e.g. `BSP-376-I`) and
/// carry the numeric chromosome used for length lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub chrom_id: String,
    pub chromosome: u32,
    pub position: u64,
    pub ref_allele: String,
    pub var_allele: String,
    pub base_geno: String,
    pub hmm_state1: String,
    pub ref_reads: u32,
    pub var_reads: u32,
}

impl Marker {
    /// Total read depth at this marker.
    pub fn coverage(&self) -> u32 {
        self.ref_reads + self.var_reads
    }

    /// Reference read fraction, undefined at zero depth.
    pub fn homozygosity(&self) -> Option<f64> {
        let total = self.ref_reads + self.var_reads;
        (total > 0).then(|| self.ref_reads as f64 / total as f64)
    }
}

// MARK: BlockRow

/// A marker that belongs to a detected block. This is the row format of
/// the peaks output and the input of the filter and post stages: the
/// marker columns plus the block id, the assigned background genotype,
/// and the derived columns computed once at block construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRow {
    pub chrom_id: String,
    pub chromosome: u32,
    pub position: u64,
    pub ref_allele: String,
    pub var_allele: String,
    pub base_geno: String,
    pub hmm_state1: String,
    pub ref_reads: u32,
    pub var_reads: u32,
    pub blk_id: u32,
    pub background: String,
    /// Relative location on the chromosome, `position / chr_length`.
    pub location: f64,
    /// Reference read fraction, empty at zero depth.
    pub homozygosity: Option<f64>,
}

impl BlockRow {
    pub fn from_marker(marker: &Marker, blk_id: u32, background: &str, chr_length: u64) -> Self {
        BlockRow {
            chrom_id: marker.chrom_id.clone(),
            chromosome: marker.chromosome,
            position: marker.position,
            ref_allele: marker.ref_allele.clone(),
            var_allele: marker.var_allele.clone(),
            base_geno: marker.base_geno.clone(),
            hmm_state1: marker.hmm_state1.clone(),
            ref_reads: marker.ref_reads,
            var_reads: marker.var_reads,
            blk_id,
            background: background.to_string(),
            location: marker.position as f64 / chr_length as f64,
            homozygosity: marker.homozygosity(),
        }
    }

    pub fn coverage(&self) -> u32 {
        self.ref_reads + self.var_reads
    }
}

// MARK: NcoRow

/// A filtered block row with the appended NCO classification column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NcoRow {
    pub chrom_id: String,
    pub chromosome: u32,
    pub position: u64,
    pub ref_allele: String,
    pub var_allele: String,
    pub base_geno: String,
    pub hmm_state1: String,
    pub ref_reads: u32,
    pub var_reads: u32,
    pub blk_id: u32,
    pub background: String,
    pub location: f64,
    pub homozygosity: Option<f64>,
    pub nco: u8,
}

impl NcoRow {
    pub fn from_block_row(row: &BlockRow, nco: u8) -> Self {
        NcoRow {
            chrom_id: row.chrom_id.clone(),
            chromosome: row.chromosome,
            position: row.position,
            ref_allele: row.ref_allele.clone(),
            var_allele: row.var_allele.clone(),
            base_geno: row.base_geno.clone(),
            hmm_state1: row.hmm_state1.clone(),
            ref_reads: row.ref_reads,
            var_reads: row.var_reads,
            blk_id: row.blk_id,
            background: row.background.clone(),
            location: row.location,
            homozygosity: row.homozygosity,
            nco,
        }
    }
}

// MARK: grouping

/// Groups markers by chromosome name, markers sorted by position within
/// each group. Iteration order over the map is the sorted key order, which
/// later stages rely on for deterministic output.
pub fn group_by_chromosome(mut markers: Vec<Marker>) -> BTreeMap<String, Vec<Marker>> {
    markers.sort_by(|a, b| (&a.chrom_id, a.position).cmp(&(&b.chrom_id, b.position)));
    let mut groups: BTreeMap<String, Vec<Marker>> = BTreeMap::new();
    for marker in markers {
        groups.entry(marker.chrom_id.clone()).or_default().push(marker);
    }
    groups
}

/// Groups block rows by (chromosome name, block id) in sorted key order.
pub fn group_by_block(rows: Vec<BlockRow>) -> BTreeMap<(String, u32), Vec<BlockRow>> {
    let mut groups: BTreeMap<(String, u32), Vec<BlockRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.chrom_id.clone(), row.blk_id))
            .or_default()
            .push(row);
    }
    groups
}

#[cfg(test)]
pub(crate) fn test_marker(chrom_id: &str, position: u64, state: &str) -> Marker {
    Marker {
        chrom_id: chrom_id.to_string(),
        chromosome: 1,
        position,
        ref_allele: "A".to_string(),
        var_allele: "T".to_string(),
        base_geno: state.to_string(),
        hmm_state1: state.to_string(),
        ref_reads: 5,
        var_reads: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homozygosity() {
        let mut marker = test_marker("BSP-1-I", 100, "N2");
        marker.ref_reads = 9;
        marker.var_reads = 1;
        assert_eq!(marker.homozygosity(), Some(0.9));
        assert_eq!(marker.coverage(), 10);

        marker.ref_reads = 0;
        marker.var_reads = 0;
        assert_eq!(marker.homozygosity(), None);
    }

    #[test]
    fn test_group_by_chromosome_sorts() {
        let markers = vec![
            test_marker("BSP-2-I", 300, "N2"),
            test_marker("BSP-1-I", 200, "N2"),
            test_marker("BSP-1-I", 100, "N2"),
        ];
        let groups = group_by_chromosome(markers);
        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["BSP-1-I", "BSP-2-I"]);
        let positions: Vec<u64> = groups["BSP-1-I"].iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![100, 200]);
    }
}
