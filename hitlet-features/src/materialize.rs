//! Hitlet materialization: hit metadata plus calibrated waveform data.

use hitlet_core::calibration::CalibrationConfig;
use hitlet_core::error::{Error, Result};
use hitlet_core::hit::LoneHit;
use hitlet_core::hitlet::WorkingHitlet;
use hitlet_core::record::WaveformRecord;

/// Builds one working hitlet per hit, with calibrated waveform buffers.
///
/// All buffers in a batch share one width, the maximum hit length (zero
/// for an empty batch); samples beyond a hitlet's own length stay zero.
/// Hits must already have passed
/// [`validate_containment`](crate::containment::validate_containment).
///
/// # Errors
/// - [`Error::MissingGain`] when a hit's channel is outside the
///   calibration table.
/// - [`Error::InvalidRecordIndex`] when a hit references a record
///   index outside the batch.
/// - [`Error::MisalignedHit`] when a hit's start is not on its source
///   record's sample grid.
/// - [`Error::HitOutOfRecord`] when the sample window extends past the
///   source record (a hit spanning a chunk boundary; upstream
///   guarantees single-record containment, so this is fatal).
pub fn materialize_hitlets(
    records: &[WaveformRecord],
    hits: &[LoneHit],
    calibration: &CalibrationConfig,
) -> Result<Vec<WorkingHitlet>> {
    let nsamples = hits.iter().map(|hit| hit.length as usize).max().unwrap_or(0);

    let mut hitlets = Vec::with_capacity(hits.len());
    for (hit_i, hit) in hits.iter().enumerate() {
        let mut working = WorkingHitlet::with_buffer(nsamples);
        working.hitlet.time = hit.time;
        working.hitlet.length = hit.length;
        working.hitlet.dt = hit.dt;
        working.hitlet.channel = hit.channel;
        working.hitlet.hit_length = hit.length;
        working.hitlet.record_i = hit.record_i;

        fill_waveform(&mut working, records, hit, hit_i, calibration)?;
        hitlets.push(working);
    }
    Ok(hitlets)
}

/// Copies the hit's sample window out of its source record, applying
/// the per-channel gain.
fn fill_waveform(
    working: &mut WorkingHitlet,
    records: &[WaveformRecord],
    hit: &LoneHit,
    hit_i: usize,
    calibration: &CalibrationConfig,
) -> Result<()> {
    let gain = calibration.gain(hit.channel)?;
    let record = records.get(hit.record_i).ok_or(Error::InvalidRecordIndex {
        hit_i,
        record_i: hit.record_i,
        records: records.len(),
    })?;

    let offset_ns = hit.time - record.time;
    if record.dt == 0 || offset_ns % i64::from(record.dt) != 0 {
        return Err(Error::MisalignedHit {
            hit_i,
            record_i: hit.record_i,
            offset_ns,
            dt: record.dt,
        });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let offset = (offset_ns / i64::from(record.dt)) as usize;

    let needed = hit.length as usize;
    let available = record.len().saturating_sub(offset);
    if needed > available {
        return Err(Error::HitOutOfRecord {
            hit_i,
            record_i: hit.record_i,
            needed,
            available,
            offset,
        });
    }

    let window = &record.samples[offset..offset + needed];
    for (out, &raw) in working.data.iter_mut().zip(window) {
        *out = f32::from(raw) * gain;
    }
    Ok(())
}
