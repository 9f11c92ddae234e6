use serde::{Deserialize, Serialize};

use crate::config::{GENOTYPE_A, GENOTYPE_B, opposite_genotype};
use crate::helper::marker::Marker;

// MARK: CrossoverEvent

/// An inferred ancestry breakpoint on a chromosome. The purity scores on
/// either side of the breakpoint decide which parental genotype applies
/// upstream of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub chrom_id: String,
    pub position: u64,
    pub up_purity: f64,
    pub dn_purity: f64,
}

// MARK: assign_background

/// Assigns a piecewise-constant background genotype to every marker.
///
/// With no crossover events (absent or empty) the whole chromosome gets
/// the majority ancestry label; an exact tie goes to `GENOTYPE_B`. With
/// events, each breakpoint closes a segment: markers up to and including
/// the breakpoint position get `GENOTYPE_A` when the upstream purity is
/// the higher one, `GENOTYPE_B` otherwise, and markers past the last
/// breakpoint get the opposite of the last assigned label. Events are
/// sorted by position here rather than trusting caller order.
pub fn assign_background(markers: &[Marker], crossovers: Option<&[CrossoverEvent]>) -> Vec<String> {
    let events = match crossovers {
        Some(events) if !events.is_empty() => events,
        _ => return vec![majority_genotype(markers).to_string(); markers.len()],
    };

    let mut events = events.to_vec();
    events.sort_by_key(|e| e.position);

    let mut column = vec![String::new(); markers.len()];
    let mut left = 0u64;
    let mut mid = 0u64;
    let mut genotype = GENOTYPE_B;
    for event in &events {
        mid = event.position;
        genotype = if event.up_purity > event.dn_purity {
            GENOTYPE_A
        } else {
            GENOTYPE_B
        };
        for (i, marker) in markers.iter().enumerate() {
            if left <= marker.position && marker.position <= mid {
                column[i] = genotype.to_string();
            }
        }
        left = mid;
    }

    let tail = opposite_genotype(genotype);
    for (i, marker) in markers.iter().enumerate() {
        if marker.position > mid {
            column[i] = tail.to_string();
        }
    }

    column
}

/// Majority ancestry label across the chromosome; ties favor
/// `GENOTYPE_B` since equal counts fail the `>` comparison.
fn majority_genotype(markers: &[Marker]) -> &'static str {
    let count_a = markers.iter().filter(|m| m.hmm_state1 == GENOTYPE_A).count();
    let count_b = markers.iter().filter(|m| m.hmm_state1 == GENOTYPE_B).count();
    if count_a > count_b { GENOTYPE_A } else { GENOTYPE_B }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::marker::test_marker;

    fn event(position: u64, up_purity: f64, dn_purity: f64) -> CrossoverEvent {
        CrossoverEvent {
            chrom_id: "BSP-1-I".to_string(),
            position,
            up_purity,
            dn_purity,
        }
    }

    #[test]
    fn test_majority_without_crossovers() {
        let markers = vec![
            test_marker("BSP-1-I", 100, GENOTYPE_A),
            test_marker("BSP-1-I", 200, GENOTYPE_A),
            test_marker("BSP-1-I", 300, GENOTYPE_B),
        ];
        assert_eq!(
            assign_background(&markers, None),
            vec![GENOTYPE_A; 3]
        );
    }

    #[test]
    fn test_majority_tie_favors_b() {
        let markers = vec![
            test_marker("BSP-1-I", 100, GENOTYPE_A),
            test_marker("BSP-1-I", 200, GENOTYPE_B),
        ];
        assert_eq!(assign_background(&markers, None), vec![GENOTYPE_B; 2]);
    }

    #[test]
    fn test_empty_crossovers_fall_back_to_majority() {
        let markers = vec![
            test_marker("BSP-1-I", 100, GENOTYPE_B),
            test_marker("BSP-1-I", 200, GENOTYPE_B),
            test_marker("BSP-1-I", 300, GENOTYPE_A),
        ];
        assert_eq!(assign_background(&markers, Some(&[])), vec![GENOTYPE_B; 3]);
    }

    #[test]
    fn test_single_crossover_splits_chromosome() {
        let markers = vec![
            test_marker("BSP-1-I", 100, GENOTYPE_A),
            test_marker("BSP-1-I", 500, GENOTYPE_A),
            test_marker("BSP-1-I", 501, GENOTYPE_B),
            test_marker("BSP-1-I", 900, GENOTYPE_B),
        ];
        // upstream purity wins: A up to and including 500, B after
        let column = assign_background(&markers, Some(&[event(500, 0.95, 0.4)]));
        assert_eq!(column, vec![GENOTYPE_A, GENOTYPE_A, GENOTYPE_B, GENOTYPE_B]);

        // downstream purity wins: B upstream, A after
        let column = assign_background(&markers, Some(&[event(500, 0.4, 0.95)]));
        assert_eq!(column, vec![GENOTYPE_B, GENOTYPE_B, GENOTYPE_A, GENOTYPE_A]);
    }

    #[test]
    fn test_unsorted_crossovers_are_sorted() {
        let markers = vec![
            test_marker("BSP-1-I", 100, GENOTYPE_A),
            test_marker("BSP-1-I", 600, GENOTYPE_B),
            test_marker("BSP-1-I", 1200, GENOTYPE_A),
        ];
        let events = vec![event(1000, 0.3, 0.9), event(500, 0.9, 0.3)];
        let column = assign_background(&markers, Some(&events));
        assert_eq!(column, vec![GENOTYPE_A, GENOTYPE_B, GENOTYPE_A]);
    }
}
