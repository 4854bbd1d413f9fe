//! Hitlet record types and per-batch feature statistics.
//!
//! A [`Hitlet`] is the permanent, fixed-width feature record describing
//! one lone hit's shape. A [`WorkingHitlet`] is the ephemeral per-batch
//! form that additionally carries the calibrated waveform buffer the
//! feature extractor reads from. The compact output record is embedded
//! as a field of the working record, so dropping the waveform buffer is
//! a structural projection ([`WorkingHitlet::compact`]) rather than a
//! field-by-field copy that could drift as fields are added.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of area decile positions (fractions 0.0, 0.1, ..., 1.0).
pub const N_DECILES: usize = 11;

/// Fixed-width feature record for one lone hit.
///
/// Never carries the waveform payload; all shape features are scalars
/// or fixed-size vectors so the record is storable at constant width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hitlet {
    /// Start time in detector clock units (nanoseconds).
    pub time: i64,
    /// Length of the hitlet in samples.
    pub length: u32,
    /// Sample period in nanoseconds.
    pub dt: u32,
    /// Channel (PMT) id.
    pub channel: u16,
    /// Length of the originating hit in samples.
    pub hit_length: u32,
    /// Total area in physical units (PE).
    pub area: f32,
    /// Maximum sample value in PE per sample.
    pub amplitude: f32,
    /// Time of the maximum relative to `time`, in nanoseconds.
    pub time_amplitude: i32,
    /// Conditional entropy of the waveform shape against a flat template.
    pub entropy: f32,
    /// Widths (ns) of the central 0%, 10%, ..., 100% area fractions.
    pub width: [f32; N_DECILES],
    /// Area decile positions (ns) relative to the 50% area midpoint.
    pub area_decile_from_midpoint: [f32; N_DECILES],
    /// Full width at half maximum (ns).
    pub fwhm: f32,
    /// Full width at tenth maximum (ns).
    pub fwtm: f32,
    /// Left edge (ns from `time`) of the half-maximum crossing.
    pub left: f32,
    /// Left edge (ns from `time`) of the tenth-maximum crossing.
    pub low_left: f32,
    /// Index of the source record within the batch.
    pub record_i: usize,
}

/// Ephemeral per-batch hitlet carrying the calibrated waveform buffer.
///
/// The buffer width is uniform across a batch (the maximum hit length);
/// samples beyond `hitlet.hit_length` are zero padding. Working hitlets
/// are filled by the materializer and feature extractor, projected to
/// their compact form, and then dropped; they are never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkingHitlet {
    /// The compact record all fields are written into.
    pub hitlet: Hitlet,
    /// Calibrated waveform samples (PE per sample), zero-padded.
    pub data: Vec<f32>,
}

impl WorkingHitlet {
    /// Creates a working hitlet with a zeroed buffer of `nsamples`.
    #[must_use]
    pub fn with_buffer(nsamples: usize) -> Self {
        Self {
            hitlet: Hitlet::default(),
            data: vec![0.0; nsamples],
        }
    }

    fn valid_len(&self) -> usize {
        (self.hitlet.hit_length as usize).min(self.data.len())
    }

    /// The valid (non-padding) samples of the waveform buffer.
    #[must_use]
    pub fn valid_data(&self) -> &[f32] {
        &self.data[..self.valid_len()]
    }

    /// Splits into the compact record and the valid samples, for
    /// writing features while reading the waveform.
    #[must_use]
    pub fn split_valid(&mut self) -> (&mut Hitlet, &[f32]) {
        let n = self.valid_len();
        (&mut self.hitlet, &self.data[..n])
    }

    /// Projects to the fixed-width record, discarding the buffer.
    #[must_use]
    pub fn compact(&self) -> Hitlet {
        self.hitlet
    }
}

/// Per-batch counters for defaulted feature computations.
///
/// Some hitlets legitimately carry degenerate waveforms (single sample,
/// zero or negative total area) for which entropy and width features
/// are undefined. Those fields are left at zero and counted here so the
/// rate stays observable without aborting the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureStatistics {
    /// Hitlets processed.
    pub hitlets: usize,
    /// Hitlets shorter than two samples; all shape features defaulted.
    pub degenerate_length: usize,
    /// Hitlets whose entropy was undefined (non-positive total).
    pub entropy_defaulted: usize,
    /// Hitlets whose FWHM/FWTM were undefined (non-positive amplitude).
    pub amplitude_width_defaulted: usize,
    /// Hitlets whose decile widths were undefined (non-positive area).
    pub area_width_defaulted: usize,
}

impl FeatureStatistics {
    /// Total count of defaulted feature computations.
    ///
    /// A single hitlet can default several features (a zero-area
    /// waveform defaults both entropy and decile widths), so this is
    /// an upper bound on the number of affected hitlets.
    #[must_use]
    pub fn defaulted(&self) -> usize {
        self.degenerate_length
            + self.entropy_defaulted
            + self.amplitude_width_defaulted
            + self.area_width_defaulted
    }

    /// Merges counters from another batch into this one.
    pub fn merge(&mut self, other: &FeatureStatistics) {
        self.hitlets += other.hitlets;
        self.degenerate_length += other.degenerate_length;
        self.entropy_defaulted += other.entropy_defaulted;
        self.amplitude_width_defaulted += other.amplitude_width_defaulted;
        self.area_width_defaulted += other.area_width_defaulted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_drops_buffer_only() {
        let mut working = WorkingHitlet::with_buffer(8);
        working.hitlet.time = 100;
        working.hitlet.length = 5;
        working.hitlet.hit_length = 5;
        working.hitlet.area = 9.0;
        working.hitlet.width[5] = 3.5;
        working.data[0] = 1.0;

        let compact = working.compact();
        assert_eq!(compact.time, 100);
        assert_eq!(compact.length, 5);
        assert!((compact.area - 9.0).abs() < f32::EPSILON);
        assert!((compact.width[5] - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_valid_data_respects_hit_length() {
        let mut working = WorkingHitlet::with_buffer(6);
        working.hitlet.hit_length = 4;
        working.data = vec![1.0, 2.0, 3.0, 2.0, 0.0, 0.0];
        assert_eq!(working.valid_data(), &[1.0, 2.0, 3.0, 2.0]);
    }

    #[test]
    fn test_split_valid_matches_valid_data() {
        let mut working = WorkingHitlet::with_buffer(6);
        working.hitlet.hit_length = 4;
        working.data = vec![1.0, 2.0, 3.0, 2.0, 0.0, 0.0];

        let expected = working.valid_data().to_vec();
        let (hitlet, data) = working.split_valid();
        hitlet.area = 8.0;
        assert_eq!(data, expected.as_slice());
        assert!((working.hitlet.area - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_statistics_merge() {
        let mut a = FeatureStatistics {
            hitlets: 10,
            degenerate_length: 1,
            ..FeatureStatistics::default()
        };
        let b = FeatureStatistics {
            hitlets: 5,
            entropy_defaulted: 2,
            ..FeatureStatistics::default()
        };
        a.merge(&b);
        assert_eq!(a.hitlets, 15);
        assert_eq!(a.degenerate_length, 1);
        assert_eq!(a.entropy_defaulted, 2);
        assert_eq!(a.defaulted(), 3);
    }
}
