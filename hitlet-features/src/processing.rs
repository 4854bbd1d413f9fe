//! High-level helpers that run the full hitlet pipeline on a chunk.
//!
//! A chunk is the time-bounded batch of records and lone hits the
//! upstream framework hands over. Processing runs containment
//! validation, materialization, feature extraction and compaction in
//! order; chunks are independent and carry no shared state.

use hitlet_core::calibration::CalibrationConfig;
use hitlet_core::error::Result;
use hitlet_core::hit::LoneHit;
use hitlet_core::hitlet::{FeatureStatistics, Hitlet, WorkingHitlet};
use hitlet_core::record::WaveformRecord;

use crate::containment::validate_containment;
use crate::features::{compute_features, FeatureConfig};
use crate::materialize::materialize_hitlets;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One time-bounded batch of records and hits.
///
/// The `[start, end)` bounds come from the upstream chunking contract;
/// the pipeline itself only consumes `records` and `hits`, but the
/// bounds travel with the data for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    /// Chunk start time (nanoseconds).
    pub start: i64,
    /// Chunk end time (nanoseconds).
    pub end: i64,
    /// Time-ordered waveform records of the chunk.
    pub records: Vec<WaveformRecord>,
    /// Lone hits found in those records, referencing them by index.
    pub hits: Vec<LoneHit>,
}

impl Chunk {
    /// Creates a chunk.
    #[must_use]
    pub fn new(start: i64, end: i64, records: Vec<WaveformRecord>, hits: Vec<LoneHit>) -> Self {
        Self {
            start,
            end,
            records,
            hits,
        }
    }
}

/// Output of processing one chunk: compact hitlets plus the feature
/// statistics accumulated while computing them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessedChunk {
    /// One hitlet per input hit, in input order.
    pub hitlets: Vec<Hitlet>,
    /// Counters of defaulted feature computations.
    pub statistics: FeatureStatistics,
}

impl ProcessedChunk {
    /// Appends another chunk's output to this one, merging statistics.
    pub fn append(&mut self, other: &ProcessedChunk) {
        self.hitlets.extend_from_slice(&other.hitlets);
        self.statistics.merge(&other.statistics);
    }
}

/// Runs validation, materialization, feature extraction and compaction
/// on one chunk.
///
/// Output cardinality always equals the input hit count, including the
/// empty chunk.
///
/// # Errors
/// Propagates the fatal batch errors of
/// [`validate_containment`](crate::containment::validate_containment)
/// and [`materialize_hitlets`](crate::materialize::materialize_hitlets);
/// per-hitlet feature failures are returned as statistics, never as
/// errors.
pub fn process_chunk(
    chunk: &Chunk,
    calibration: &CalibrationConfig,
    config: &FeatureConfig,
) -> Result<ProcessedChunk> {
    validate_containment(&chunk.records, &chunk.hits)?;

    let mut working = materialize_hitlets(&chunk.records, &chunk.hits, calibration)?;
    let statistics = compute_features(&mut working, config);

    // Working hitlets and their waveform buffers end here; only the
    // fixed-width projection leaves the function.
    let hitlets = working.iter().map(WorkingHitlet::compact).collect();
    Ok(ProcessedChunk {
        hitlets,
        statistics,
    })
}

/// Processes a stream of chunks, concatenating hitlets in chunk order
/// and merging statistics.
///
/// # Errors
/// Stops at the first chunk that fails with a fatal batch error.
pub fn process_stream<I>(
    chunks: I,
    calibration: &CalibrationConfig,
    config: &FeatureConfig,
) -> Result<ProcessedChunk>
where
    I: IntoIterator<Item = Chunk>,
{
    let mut combined = ProcessedChunk::default();
    for chunk in chunks {
        let processed = process_chunk(&chunk, calibration, config)?;
        combined.append(&processed);
    }
    Ok(combined)
}
