//! Lone hit types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single detected pulse that was not grouped into a larger
/// multi-channel cluster.
///
/// Lone hits are produced by the upstream hit finder and consumed
/// exactly once by the materializer. `record_i` indexes the source
/// [`WaveformRecord`](crate::record::WaveformRecord) within the same
/// batch; the hit's start time must lie inside that record's time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoneHit {
    /// Start time in detector clock units (nanoseconds).
    pub time: i64,
    /// Length of the hit in samples.
    pub length: u32,
    /// Sample period in nanoseconds (same as the source record's).
    pub dt: u32,
    /// Channel (PMT) id.
    pub channel: u16,
    /// Raw peak amplitude in ADC counts, as reported by the hit finder.
    pub amplitude: i16,
    /// Index of the source record within the batch.
    pub record_i: usize,
}

impl LoneHit {
    /// Creates a new lone hit.
    #[must_use]
    pub fn new(
        time: i64,
        length: u32,
        dt: u32,
        channel: u16,
        amplitude: i16,
        record_i: usize,
    ) -> Self {
        Self {
            time,
            length,
            dt,
            channel,
            amplitude,
            record_i,
        }
    }

    /// End time of the hit window: `time + length * dt`.
    #[must_use]
    pub fn end_time(&self) -> i64 {
        self.time + i64::from(self.length) * i64::from(self.dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lone_hit() {
        let hit = LoneHit::new(1040, 5, 10, 7, 120, 2);
        assert_eq!(hit.end_time(), 1090);
        assert_eq!(hit.record_i, 2);
        assert_eq!(hit.channel, 7);
    }
}
