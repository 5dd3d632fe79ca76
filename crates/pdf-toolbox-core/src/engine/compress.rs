//! Lossless compression policy.

use crate::error::{Error, Result};
use crate::options::CompressionOptions;
use crate::pdf::{OptimizationStats, OptimizeOptions, OptimizedPdf};

/// Output of a compression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOutcome {
    pub bytes: Vec<u8>,
    /// Present only when statistics were requested
    pub stats: Option<OptimizationStats>,
}

/// Translate caller options into provider flags.
pub const fn optimize_options(options: CompressionOptions) -> OptimizeOptions {
    OptimizeOptions {
        collect_stats: options.collect_stats,
    }
}

/// Reject an empty optimization result.
pub fn check_output(optimized: OptimizedPdf) -> Result<CompressionOutcome> {
    if optimized.bytes.is_empty() {
        return Err(Error::OptimizationProducedEmptyOutput);
    }
    Ok(CompressionOutcome {
        bytes: optimized.bytes,
        stats: optimized.stats,
    })
}
