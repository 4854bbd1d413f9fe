//! Waveform record types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fixed-length digitized waveform slice for one channel.
///
/// Records are produced by the upstream readout pipeline in time order
/// and are read-only inputs to hitlet processing. Samples are
/// baseline-subtracted ADC counts; the per-channel gain converting them
/// to physical units lives in
/// [`CalibrationConfig`](crate::calibration::CalibrationConfig).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaveformRecord {
    /// Start time in detector clock units (nanoseconds).
    pub time: i64,
    /// Sample period in nanoseconds. Must be nonzero.
    pub dt: u32,
    /// Channel (PMT) id.
    pub channel: u16,
    /// Baseline-subtracted ADC samples.
    pub samples: Vec<i16>,
}

impl WaveformRecord {
    /// Creates a new waveform record.
    #[must_use]
    pub fn new(time: i64, dt: u32, channel: u16, samples: Vec<i16>) -> Self {
        Self {
            time,
            dt,
            channel,
            samples,
        }
    }

    /// Number of samples in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the record holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// End time of the record: `time + len * dt`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn end_time(&self) -> i64 {
        self.time + self.samples.len() as i64 * i64::from(self.dt)
    }

    /// Checks whether a time instant lies within `[time, end_time()]`.
    #[inline]
    #[must_use]
    pub fn contains(&self, t: i64) -> bool {
        self.time <= t && t <= self.end_time()
    }
}
