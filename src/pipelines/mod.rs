use thiserror::Error;

pub mod filter;
pub mod peaks;
pub mod post;

/// Aggregated per-unit failures. Individual chromosome or block failures
/// never abort the other units; they are collected and reported once the
/// healthy output has been written.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{failed} of {total} chromosomes failed: {details}")]
    ChromosomesFailed {
        failed: usize,
        total: usize,
        details: String,
    },
}
