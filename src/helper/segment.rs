use crate::config::{GENOTYPE_A, GENOTYPE_B};
use crate::helper::marker::Marker;

// MARK: Block

/// A contiguous run of markers around an ancestry-switch peak. Holds the
/// inclusive index range into the chromosome's marker slice; ids are
/// assigned sequentially in peak-discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub blk_id: u32,
    pub start: usize,
    pub end: usize,
}

impl Block {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn markers<'a>(&self, markers: &'a [Marker]) -> &'a [Marker] {
        &markers[self.start..=self.end]
    }
}

// MARK: ancestry signal

/// Running score over the marker index: +1 for each marker in state A,
/// -1 for each in state B. The score drifts while one ancestry dominates
/// and reverses direction at switch points; states matching neither
/// parental genotype leave it unchanged.
fn ancestry_signal(markers: &[Marker]) -> Vec<i64> {
    let mut acc = 0i64;
    markers
        .iter()
        .map(|m| {
            if m.hmm_state1 == GENOTYPE_A {
                acc += 1;
            } else if m.hmm_state1 == GENOTYPE_B {
                acc -= 1;
            }
            acc
        })
        .collect()
}

// MARK: peak detection

/// Indices of local maxima, plateau-aware: a plateau bordered by strictly
/// smaller samples on both sides yields its (rounded-down) midpoint.
/// Boundary samples are never maxima.
fn local_maxima(signal: &[i64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if signal.len() < 3 {
        return maxima;
    }
    let i_max = signal.len() - 1;
    let mut i = 1;
    while i < i_max {
        if signal[i - 1] < signal[i] {
            let mut i_ahead = i + 1;
            while i_ahead < i_max && signal[i_ahead] == signal[i] {
                i_ahead += 1;
            }
            if signal[i_ahead] < signal[i] {
                // left and right edges of the plateau (a single sample is
                // a plateau of width one)
                maxima.push((i + i_ahead - 1) / 2);
                i = i_ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Topographic prominence of the peak at `peak`, with the positions of the
/// left and right bases. Walks outward on each side until a sample higher
/// than the peak or the sequence boundary, tracking the minimum seen; the
/// prominence is the peak height above the higher of the two minima.
fn peak_prominence(signal: &[i64], peak: usize) -> (i64, usize, usize) {
    let mut left_base = peak;
    let mut left_min = signal[peak];
    let mut i = peak as isize;
    while i >= 0 && signal[i as usize] <= signal[peak] {
        if signal[i as usize] < left_min {
            left_min = signal[i as usize];
            left_base = i as usize;
        }
        i -= 1;
    }

    let mut right_base = peak;
    let mut right_min = signal[peak];
    let mut j = peak;
    while j < signal.len() && signal[j] <= signal[peak] {
        if signal[j] < right_min {
            right_min = signal[j];
            right_base = j;
        }
        j += 1;
    }

    (signal[peak] - left_min.max(right_min), left_base, right_base)
}

// MARK: find_blocks

/// Segments one chromosome's markers into blocks around ancestry-switch
/// peaks. For each peak with prominence >= 1, the block is the side of the
/// peak that contains the embedded minority run: markers in
/// `(left_base, peak]` when the left base sits exactly `prominence` below
/// the peak index, otherwise `(peak, right_base]`. Blocks with more than
/// `max_block_size` markers are dropped whole. An empty result means no
/// blocks in this chromosome, not an error.
pub fn find_blocks(markers: &[Marker], max_block_size: usize) -> Vec<Block> {
    let signal = ancestry_signal(markers);
    let mut blocks = Vec::new();
    for px in local_maxima(&signal) {
        let (prominence, left_base, right_base) = peak_prominence(&signal, px);
        if prominence < 1 {
            continue;
        }
        let (start, end) = if left_base as i64 == px as i64 - prominence {
            (left_base + 1, px)
        } else {
            (px + 1, right_base)
        };
        if end - start + 1 > max_block_size {
            continue;
        }
        blocks.push(Block {
            blk_id: blocks.len() as u32,
            start,
            end,
        });
    }
    blocks
}
