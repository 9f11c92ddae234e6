use std::collections::HashMap;

use once_cell::sync::Lazy;

/// The two parental genotype names assigned by the upstream HMM classifier.
/// `GENOTYPE_A` contributes +1 to the ancestry signal, `GENOTYPE_B` -1.
/// Markers labeled with anything else (het, unknown, low-confidence calls)
/// do not move the signal.
pub const GENOTYPE_A: &str = "CB4856";
pub const GENOTYPE_B: &str = "N2";

/// Chromosome lengths in base pairs, keyed by chromosome number.
/// A lookup miss is a configuration error for that chromosome.
pub static CHR_LENGTH: Lazy<HashMap<u32, u64>> = Lazy::new(|| {
    HashMap::from([
        (1, 15114068),
        (2, 15311845),
        (3, 13819453),
        (4, 17493838),
        (5, 20953657),
        (6, 17739129),
    ])
});

/// Returns the other parental genotype name.
pub fn opposite_genotype(genotype: &str) -> &'static str {
    if genotype == GENOTYPE_A {
        GENOTYPE_B
    } else {
        GENOTYPE_A
    }
}

// peaks defaults
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 1000;
pub const DEFAULT_SAMPLE_SIZE: usize = 100000;

// filter defaults
pub const DEFAULT_CHROMOSOME_PATTERN: &str = "BSP.*";
pub const DEFAULT_BLOCK_SIZE_RANGE: (u64, u64) = (0, 100);
pub const DEFAULT_BLOCK_LENGTH_RANGE: (u64, u64) = (0, 10000);
pub const DEFAULT_COVERAGE: u32 = 0;

// post defaults
pub const DEFAULT_MIN_Z: f64 = 0.9;
pub const DEFAULT_DELTA_Z: f64 = 0.1;
pub const DEFAULT_MIN_COVER: u32 = 2;
pub const DEFAULT_RUN_SIZE: usize = 5;
