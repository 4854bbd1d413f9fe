//! Containment validation of hits against their source records.

use hitlet_core::error::{Error, Result};
use hitlet_core::hit::LoneHit;
use hitlet_core::record::WaveformRecord;

/// Checks every hit against the time span of its declared source record.
///
/// Returns one flag per hit: true iff
/// `record.time <= hit.time <= record.end_time()` for
/// `record = records[hit.record_i]`. A `record_i` outside the records
/// array also yields false.
#[must_use]
pub fn check_containment(records: &[WaveformRecord], hits: &[LoneHit]) -> Vec<bool> {
    hits.iter()
        .map(|hit| {
            records
                .get(hit.record_i)
                .is_some_and(|record| record.contains(hit.time))
        })
        .collect()
}

/// Validates that all hits are contained in their source records.
///
/// Empty batches validate vacuously. A single uncontained hit fails the
/// whole batch: misaligned chunk boundaries upstream invalidate every
/// hit-to-record association, so there is nothing to salvage.
///
/// # Errors
/// Returns [`Error::DataIntegrity`] naming the mismatch count against
/// the batch total when any hit lies outside its source record.
pub fn validate_containment(records: &[WaveformRecord], hits: &[LoneHit]) -> Result<()> {
    let contained = check_containment(records, hits);
    let mismatched = contained.iter().filter(|&&ok| !ok).count();
    if mismatched > 0 {
        return Err(Error::DataIntegrity {
            mismatched,
            total: hits.len(),
        });
    }
    Ok(())
}
