//! hitlet-features: Batch algorithms for lone-hit hitlet extraction.
//!
//! This crate turns raw waveform records and lone hits into compact
//! hitlet feature records, in four stages per chunk:
//! - **Containment** - validates hits against their source records
//! - **Materialization** - calibrated per-hit waveform buffers
//! - **Feature extraction** - amplitude, area, entropy, decile widths
//! - **Compaction** - fixed-width output records without the waveform
//!
#![warn(missing_docs)]

mod containment;
mod entropy;
mod features;
mod materialize;
mod processing;

pub use containment::{check_containment, validate_containment};
pub use entropy::{conditional_entropy, EntropyTemplate};
pub use features::{
    compute_features, compute_hitlet_features, default_fractions, FeatureConfig, N_FRACTIONS,
};
pub use materialize::materialize_hitlets;
pub use processing::{process_chunk, process_stream, Chunk, ProcessedChunk};

// Re-export the core record types batch callers need.
pub use hitlet_core::{
    CalibrationConfig, Error, FeatureStatistics, Hitlet, LoneHit, Result, WaveformRecord,
    WorkingHitlet,
};
