//! Error types for hitlet-core.

use thiserror::Error;

/// Result type alias for hitlet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for hitlet operations.
///
/// All variants are fatal at batch granularity. Per-hitlet feature
/// failures are not errors; they are reported through
/// [`FeatureStatistics`](crate::hitlet::FeatureStatistics) counters.
#[derive(Error, Debug)]
pub enum Error {
    /// Hits whose start times fall outside their declared source record.
    /// Signals that upstream chunking did not align records and hits.
    #[error("{mismatched} of {total} hits lie outside their source record")]
    DataIntegrity {
        /// Number of hits failing the containment check.
        mismatched: usize,
        /// Total number of hits in the batch.
        total: usize,
    },

    /// Hit references a record index outside the batch.
    #[error("hit {hit_i} references record {record_i} but the batch holds {records} records")]
    InvalidRecordIndex {
        /// Index of the offending hit within the batch.
        hit_i: usize,
        /// Out-of-bounds source record index.
        record_i: usize,
        /// Number of records in the batch.
        records: usize,
    },

    /// Hit sample window extends past the end of its source record.
    #[error(
        "hit {hit_i} needs {needed} samples at offset {offset} but record {record_i} holds {available}"
    )]
    HitOutOfRecord {
        /// Index of the offending hit within the batch.
        hit_i: usize,
        /// Index of the source record.
        record_i: usize,
        /// Samples required by the hit window.
        needed: usize,
        /// Samples available from the offset to the record end.
        available: usize,
        /// Sample offset of the hit within the record.
        offset: usize,
    },

    /// Hit start time not on the source record's sample grid.
    #[error("hit {hit_i} starts {offset_ns} ns into record {record_i}, not a multiple of dt={dt} ns")]
    MisalignedHit {
        /// Index of the offending hit within the batch.
        hit_i: usize,
        /// Index of the source record.
        record_i: usize,
        /// Hit start relative to the record start, in nanoseconds.
        offset_ns: i64,
        /// Record sample period in nanoseconds.
        dt: u32,
    },

    /// No calibration gain known for a channel present in the batch.
    #[error("no gain for channel {0} in calibration table")]
    MissingGain(u16),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
