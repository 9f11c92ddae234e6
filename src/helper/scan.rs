use crate::config::{self, GENOTYPE_A};
use crate::helper::marker::BlockRow;

/// Cap on candidate runs collected per block, bounding worst-case cost on
/// pathological inputs.
pub const MAX_CANDIDATES: usize = 4;

// MARK: classification codes

/// Per-marker classification values written to the `nco` column.
pub const NCO_NONE: u8 = 0;
pub const NCO_RUN: u8 = 1;
pub const NCO_SELECTED: u8 = 2;

// MARK: RunScanConfig

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunScanConfig {
    /// Homozygosity floor for blocks on an A background.
    pub min_z: f64,
    /// Tolerance band around 0.5 for blocks on a B background.
    pub delta_z: f64,
    /// Minimum per-allele read depth.
    pub min_cover: u32,
    /// Minimum run length in markers.
    pub size: usize,
}

impl Default for RunScanConfig {
    fn default() -> Self {
        RunScanConfig {
            min_z: config::DEFAULT_MIN_Z,
            delta_z: config::DEFAULT_DELTA_Z,
            min_cover: config::DEFAULT_MIN_COVER,
            size: config::DEFAULT_RUN_SIZE,
        }
    }
}

// MARK: predicate

/// Whether a marker is consistent with a homozygosity signature, chosen
/// by the block's background genotype. Undefined homozygosity (zero
/// depth) is never consistent.
fn consistent(row: &BlockRow, config: &RunScanConfig) -> bool {
    let Some(z) = row.homozygosity else {
        return false;
    };
    if row.background == GENOTYPE_A {
        z >= config.min_z && row.ref_reads >= config.min_cover
    } else {
        (z - 0.5).abs() <= config.delta_z
            && row.ref_reads >= config.min_cover
            && row.var_reads >= config.min_cover
    }
}

// MARK: scan

/// Scans one block for the most likely NCO interval.
///
/// Collects left-to-right runs of markers where the predicate holds,
/// discarding runs shorter than `config.size` and stopping after
/// `MAX_CANDIDATES` runs. With no candidates every marker gets
/// `NCO_NONE`. Otherwise the longest candidate wins, last found on a
/// length tie; its markers get `NCO_SELECTED` and every other marker
/// where the predicate held gets `NCO_RUN`.
pub fn scan(rows: &[BlockRow], config: &RunScanConfig) -> Vec<u8> {
    let holds: Vec<bool> = rows.iter().map(|r| consistent(r, config)).collect();

    let mut candidates: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < holds.len() && candidates.len() < MAX_CANDIDATES {
        if !holds[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < holds.len() && holds[j] {
            j += 1;
        }
        if j - i >= config.size {
            candidates.push((i, j));
        }
        i = j + 1;
    }

    let mut classification = vec![NCO_NONE; rows.len()];
    let Some(selected) = select_longest(&candidates) else {
        return classification;
    };

    for (i, held) in holds.iter().enumerate() {
        if *held {
            classification[i] = NCO_RUN;
        }
    }
    for slot in &mut classification[selected.0..selected.1] {
        *slot = NCO_SELECTED;
    }
    classification
}

/// Longest candidate, last found winning ties.
fn select_longest(candidates: &[(usize, usize)]) -> Option<(usize, usize)> {
    let mut selected: Option<(usize, usize)> = None;
    for &(start, end) in candidates {
        match selected {
            Some((s, e)) if end - start < e - s => {}
            _ => selected = Some((start, end)),
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GENOTYPE_A, GENOTYPE_B};
    use crate::helper::marker::{Marker, test_marker};

    fn row(background: &str, ref_reads: u32, var_reads: u32) -> BlockRow {
        let marker = Marker {
            ref_reads,
            var_reads,
            ..test_marker("BSP-1-I", 1000, GENOTYPE_B)
        };
        BlockRow::from_marker(&marker, 0, background, 1_000_000)
    }

    fn config(size: usize) -> RunScanConfig {
        RunScanConfig {
            min_z: 0.9,
            delta_z: 0.1,
            min_cover: 2,
            size,
        }
    }

    // a marker that satisfies the A predicate (z = 1.0, deep coverage)
    fn hom(background: &str) -> BlockRow {
        row(background, 10, 0)
    }

    // a marker that fails both predicates (z = 0.2)
    fn bad(background: &str) -> BlockRow {
        row(background, 2, 8)
    }

    #[test]
    fn test_predicate_type_a() {
        let cfg = config(5);
        assert!(consistent(&row(GENOTYPE_A, 10, 0), &cfg));
        assert!(consistent(&row(GENOTYPE_A, 9, 1), &cfg)); // z = 0.9 exactly
        assert!(!consistent(&row(GENOTYPE_A, 8, 2), &cfg)); // z = 0.8
        assert!(!consistent(&row(GENOTYPE_A, 1, 0), &cfg)); // ref depth below min_cover
    }

    #[test]
    fn test_predicate_type_b() {
        let cfg = config(5);
        assert!(consistent(&row(GENOTYPE_B, 5, 5), &cfg)); // z = 0.5
        assert!(consistent(&row(GENOTYPE_B, 6, 4), &cfg)); // z = 0.6, on the band edge
        assert!(!consistent(&row(GENOTYPE_B, 7, 3), &cfg)); // z = 0.7
        assert!(!consistent(&row(GENOTYPE_B, 10, 1), &cfg)); // var depth below min_cover
    }

    #[test]
    fn test_zero_depth_is_never_consistent() {
        let cfg = config(1);
        assert!(!consistent(&row(GENOTYPE_A, 0, 0), &cfg));
        assert!(!consistent(&row(GENOTYPE_B, 0, 0), &cfg));
    }

    #[test]
    fn test_single_run_selected() {
        let mut rows = vec![bad(GENOTYPE_A), bad(GENOTYPE_A)];
        rows.extend((0..5).map(|_| hom(GENOTYPE_A)));
        rows.extend(vec![bad(GENOTYPE_A), bad(GENOTYPE_A)]);

        let classification = scan(&rows, &config(5));
        assert_eq!(classification, vec![0, 0, 2, 2, 2, 2, 2, 0, 0]);
    }

    #[test]
    fn test_longer_run_wins() {
        let mut rows = vec![];
        rows.extend((0..5).map(|_| hom(GENOTYPE_A)));
        rows.push(bad(GENOTYPE_A));
        rows.extend((0..7).map(|_| hom(GENOTYPE_A)));

        let classification = scan(&rows, &config(5));
        let expected: Vec<u8> = [vec![1u8; 5], vec![0], vec![2; 7]].concat();
        assert_eq!(classification, expected);
    }

    #[test]
    fn test_length_tie_takes_last() {
        let mut rows = vec![];
        rows.extend((0..5).map(|_| hom(GENOTYPE_A)));
        rows.push(bad(GENOTYPE_A));
        rows.extend((0..5).map(|_| hom(GENOTYPE_A)));

        let classification = scan(&rows, &config(5));
        let expected: Vec<u8> = [vec![1u8; 5], vec![0], vec![2; 5]].concat();
        assert_eq!(classification, expected);
    }

    #[test]
    fn test_short_runs_marked_but_not_selected() {
        let mut rows = vec![];
        rows.extend((0..2).map(|_| hom(GENOTYPE_A))); // too short to be a candidate
        rows.push(bad(GENOTYPE_A));
        rows.extend((0..5).map(|_| hom(GENOTYPE_A)));

        let classification = scan(&rows, &config(5));
        let expected: Vec<u8> = [vec![1u8; 2], vec![0], vec![2; 5]].concat();
        assert_eq!(classification, expected);
    }

    #[test]
    fn test_no_candidates_all_zero() {
        let rows: Vec<BlockRow> = (0..4).map(|_| hom(GENOTYPE_A)).collect();
        let classification = scan(&rows, &config(5));
        assert_eq!(classification, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_candidate_cap() {
        // five qualifying runs; only the first four are collected, so a
        // longer fifth run is never seen
        let mut rows = vec![];
        for _ in 0..4 {
            rows.extend((0..5).map(|_| hom(GENOTYPE_A)));
            rows.push(bad(GENOTYPE_A));
        }
        rows.extend((0..8).map(|_| hom(GENOTYPE_A)));

        let classification = scan(&rows, &config(5));
        // last of the four equal-length candidates is selected
        let expected: Vec<u8> = [
            vec![1u8; 5],
            vec![0],
            vec![1; 5],
            vec![0],
            vec![1; 5],
            vec![0],
            vec![2; 5],
            vec![0],
            vec![1; 8],
        ]
        .concat();
        assert_eq!(classification, expected);
    }
}
