//! Shape-feature extraction for working hitlets.
//!
//! Computes, per hitlet and over its valid samples only: amplitude and
//! its time, area, conditional entropy, amplitude-based full widths
//! (FWHM/FWTM with their left edges) and cumulative-area decile widths.
//! Degenerate waveforms default affected fields to zero and are counted
//! in [`FeatureStatistics`] instead of failing the batch.

use hitlet_core::hitlet::{FeatureStatistics, Hitlet, WorkingHitlet, N_DECILES};
use rayon::prelude::*;

use crate::entropy::{conditional_entropy, EntropyTemplate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of cumulative-area fractions a [`FeatureConfig`] carries:
/// the deciles plus the half-decile points the central widths need.
pub const N_FRACTIONS: usize = 2 * N_DECILES - 1;

/// The default fraction grid: 0.0 to 1.0 in steps of 0.05.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn default_fractions() -> [f32; N_FRACTIONS] {
    std::array::from_fn(|j| j as f32 / (N_FRACTIONS - 1) as f32)
}

/// Configuration for feature extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureConfig {
    /// Reference template for the entropy computation.
    pub template: EntropyTemplate,
    /// Square samples before normalizing for the entropy computation.
    pub square_data: bool,
    /// Cumulative-area fractions evaluated for the width features, in
    /// nondecreasing order. `width[j]` spans the fractions at indices
    /// `10 - j` and `10 + j`; `area_decile_from_midpoint[j]` reads the
    /// fraction at index `2 * j` relative to the midpoint at index 10.
    pub fractions: [f32; N_FRACTIONS],
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            template: EntropyTemplate::default(),
            square_data: false,
            fractions: default_fractions(),
        }
    }
}

impl FeatureConfig {
    /// Creates the default configuration (flat template, no squaring,
    /// decile fraction grid).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entropy template.
    #[must_use]
    pub fn with_template(mut self, template: EntropyTemplate) -> Self {
        self.template = template;
        self
    }

    /// Sets whether samples are squared before entropy normalization.
    #[must_use]
    pub fn with_square_data(mut self, square_data: bool) -> Self {
        self.square_data = square_data;
        self
    }

    /// Sets the cumulative-area fraction grid.
    #[must_use]
    pub fn with_fractions(mut self, fractions: [f32; N_FRACTIONS]) -> Self {
        self.fractions = fractions;
        self
    }
}

/// Computes shape features for every hitlet in the batch, in place.
///
/// Hitlets are independent, so the batch is processed in parallel;
/// per-hitlet statistics are merged by reduction.
#[must_use]
pub fn compute_features(
    hitlets: &mut [WorkingHitlet],
    config: &FeatureConfig,
) -> FeatureStatistics {
    hitlets
        .par_iter_mut()
        .map(|working| compute_hitlet_features(working, config))
        .reduce(FeatureStatistics::default, |mut acc, stats| {
            acc.merge(&stats);
            acc
        })
}

/// Computes features for a single hitlet, returning its statistics.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]
pub fn compute_hitlet_features(
    working: &mut WorkingHitlet,
    config: &FeatureConfig,
) -> FeatureStatistics {
    let mut stats = FeatureStatistics {
        hitlets: 1,
        ..FeatureStatistics::default()
    };

    let (hitlet, data) = working.split_valid();
    let n = data.len();
    let dt = hitlet.dt as f32;

    if n == 0 {
        stats.degenerate_length += 1;
        return stats;
    }

    // Amplitude, its time, and area are defined for any nonempty hitlet.
    let (peak_i, amplitude) = peak(data);
    hitlet.amplitude = amplitude;
    hitlet.time_amplitude = (peak_i as i64 * i64::from(hitlet.dt)) as i32;
    let area: f64 = data.iter().map(|&s| f64::from(s)).sum();
    hitlet.area = area as f32;

    // Single-sample hitlets have no shape; entropy and every width
    // field stay at their zero defaults.
    if n < 2 {
        stats.degenerate_length += 1;
        return stats;
    }

    match conditional_entropy(data, config.template, config.square_data) {
        Some(entropy) => hitlet.entropy = entropy,
        None => stats.entropy_defaulted += 1,
    }

    if amplitude > 0.0 {
        let (left, fwhm) = full_width_at(data, peak_i, amplitude, 0.5, dt);
        let (low_left, fwtm) = full_width_at(data, peak_i, amplitude, 0.1, dt);
        hitlet.left = left;
        hitlet.fwhm = fwhm;
        hitlet.low_left = low_left;
        hitlet.fwtm = fwtm;
    } else {
        stats.amplitude_width_defaulted += 1;
    }

    if area > 0.0 {
        compute_area_widths(hitlet, data, area, dt, &config.fractions);
    } else {
        stats.area_width_defaulted += 1;
    }

    stats
}

/// First maximum of the waveform: (sample index, value).
fn peak(data: &[f32]) -> (usize, f32) {
    let mut peak_i = 0;
    let mut amplitude = data[0];
    for (i, &s) in data.iter().enumerate().skip(1) {
        if s > amplitude {
            peak_i = i;
            amplitude = s;
        }
    }
    (peak_i, amplitude)
}

/// Full width of the pulse at `fraction` of its maximum.
///
/// Walks outward from the peak to the first samples below the
/// threshold and interpolates the crossing positions linearly. Where
/// the pulse never drops below the threshold, the edge clamps to the
/// waveform boundary. Returns `(left_edge, width)` in nanoseconds.
#[allow(clippy::cast_precision_loss)]
fn full_width_at(data: &[f32], peak_i: usize, amplitude: f32, fraction: f32, dt: f32) -> (f32, f32) {
    let threshold = fraction * amplitude;

    let mut left = 0.0;
    for i in (0..peak_i).rev() {
        if data[i] < threshold {
            left = (i as f32 + (threshold - data[i]) / (data[i + 1] - data[i])) * dt;
            break;
        }
    }

    let mut right = (data.len() - 1) as f32 * dt;
    for i in peak_i + 1..data.len() {
        if data[i] < threshold {
            right = ((i - 1) as f32 + (data[i - 1] - threshold) / (data[i - 1] - data[i])) * dt;
            break;
        }
    }

    (left, right - left)
}

/// Times (ns from the hitlet start) at which the cumulative area first
/// reaches each of the configured area fractions.
///
/// Fractions must be nondecreasing. Crossings are interpolated within
/// the crossing sample; on ties and plateaus the first crossing in
/// ascending sample order wins. The cumulative sum need not be
/// monotonic (samples may be negative); any fraction never reached by
/// a later dip reports the waveform end.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn area_fraction_times(
    data: &[f32],
    area: f64,
    dt: f32,
    fractions: &[f32; N_FRACTIONS],
) -> [f32; N_FRACTIONS] {
    let mut times = [data.len() as f32 * dt; N_FRACTIONS];
    let mut cumulative = 0.0f64;
    let mut next_fraction = 0;

    for (i, &sample) in data.iter().enumerate() {
        let sample = f64::from(sample);
        let reached = cumulative + sample;
        while next_fraction < N_FRACTIONS {
            let needed = area * f64::from(fractions[next_fraction]);
            if reached < needed {
                break;
            }
            let in_sample = if sample > 0.0 {
                ((needed - cumulative) / sample).clamp(0.0, 1.0)
            } else {
                0.0
            };
            times[next_fraction] = (i as f64 + in_sample) as f32 * dt;
            next_fraction += 1;
        }
        cumulative = reached;
    }
    times
}

/// Fills the decile width fields from the cumulative-area fractions.
///
/// `width[j]` is the width of the central `j * 10%` of the area;
/// `area_decile_from_midpoint[j]` is the decile position relative to
/// the 50% area time.
fn compute_area_widths(
    hitlet: &mut Hitlet,
    data: &[f32],
    area: f64,
    dt: f32,
    fractions: &[f32; N_FRACTIONS],
) {
    let times = area_fraction_times(data, area, dt, fractions);
    let midpoint = times[N_DECILES - 1];
    for j in 0..N_DECILES {
        hitlet.width[j] = times[N_DECILES - 1 + j] - times[N_DECILES - 1 - j];
        hitlet.area_decile_from_midpoint[j] = times[2 * j] - midpoint;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use approx::assert_relative_eq;

    fn working(data: Vec<f32>, dt: u32) -> WorkingHitlet {
        let mut working = WorkingHitlet::with_buffer(data.len());
        working.hitlet.hit_length = u32::try_from(data.len()).unwrap();
        working.hitlet.length = working.hitlet.hit_length;
        working.hitlet.dt = dt;
        working.data = data;
        working
    }

    #[test]
    fn test_triangle_pulse_features() {
        let mut hitlet = working(vec![1.0, 2.0, 3.0, 2.0, 1.0], 1);
        let stats = compute_hitlet_features(&mut hitlet, &FeatureConfig::default());

        assert_eq!(stats.hitlets, 1);
        assert_eq!(stats.defaulted(), 0);
        assert_relative_eq!(hitlet.hitlet.area, 9.0);
        assert_relative_eq!(hitlet.hitlet.amplitude, 3.0);
        assert_eq!(hitlet.hitlet.time_amplitude, 2);
        // Half-max threshold 1.5 crosses at 0.5 and 3.5.
        assert_relative_eq!(hitlet.hitlet.left, 0.5);
        assert_relative_eq!(hitlet.hitlet.fwhm, 3.0);
        // Cumulative area is symmetric: midpoint at 2.5 samples.
        assert_relative_eq!(hitlet.hitlet.area_decile_from_midpoint[5], 0.0);
        assert_relative_eq!(hitlet.hitlet.width[10], 5.0);
        assert!(hitlet.hitlet.entropy < 0.0);
    }

    #[test]
    fn test_zero_padding_is_ignored() {
        let mut padded = working(vec![1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 0.0], 1);
        padded.hitlet.hit_length = 5;
        let mut exact = working(vec![1.0, 2.0, 3.0, 2.0, 1.0], 1);

        let _ = compute_hitlet_features(&mut padded, &FeatureConfig::default());
        let _ = compute_hitlet_features(&mut exact, &FeatureConfig::default());
        assert_eq!(padded.hitlet.area, exact.hitlet.area);
        assert_eq!(padded.hitlet.fwhm, exact.hitlet.fwhm);
        assert_eq!(padded.hitlet.width, exact.hitlet.width);
    }

    #[test]
    fn test_single_sample_hitlet_defaults_shape_fields() {
        let mut hitlet = working(vec![4.0], 1);
        let stats = compute_hitlet_features(&mut hitlet, &FeatureConfig::default());

        assert_eq!(stats.degenerate_length, 1);
        assert_relative_eq!(hitlet.hitlet.amplitude, 4.0);
        assert_relative_eq!(hitlet.hitlet.area, 4.0);
        assert_eq!(hitlet.hitlet.entropy, 0.0);
        assert_eq!(hitlet.hitlet.fwhm, 0.0);
        assert_eq!(hitlet.hitlet.width, [0.0; N_DECILES]);
    }

    #[test]
    fn test_zero_waveform_defaults_without_failing() {
        let mut hitlet = working(vec![0.0; 6], 1);
        let stats = compute_hitlet_features(&mut hitlet, &FeatureConfig::default());

        assert_eq!(stats.entropy_defaulted, 1);
        assert_eq!(stats.amplitude_width_defaulted, 1);
        assert_eq!(stats.area_width_defaulted, 1);
        assert_eq!(hitlet.hitlet.entropy, 0.0);
        assert_eq!(hitlet.hitlet.fwhm, 0.0);
        assert_eq!(hitlet.hitlet.area_decile_from_midpoint, [0.0; N_DECILES]);
    }

    #[test]
    fn test_dt_scales_width_features() {
        let mut coarse = working(vec![1.0, 2.0, 3.0, 2.0, 1.0], 10);
        let _ = compute_hitlet_features(&mut coarse, &FeatureConfig::default());

        assert_relative_eq!(coarse.hitlet.fwhm, 30.0);
        assert_relative_eq!(coarse.hitlet.width[10], 50.0);
        assert_eq!(coarse.hitlet.time_amplitude, 20);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_custom_fraction_grid() {
        // Same step shape, but spanning the central 25%..75% of the area.
        let fractions: [f32; N_FRACTIONS] =
            std::array::from_fn(|j| 0.25 + 0.5 * j as f32 / (N_FRACTIONS - 1) as f32);
        let config = FeatureConfig::new().with_fractions(fractions);

        let mut hitlet = working(vec![1.0, 2.0, 3.0, 2.0, 1.0], 1);
        let _ = compute_hitlet_features(&mut hitlet, &config);

        // Quartile crossings of the triangle sit at 1.625 and 3.375
        // samples; the grid midpoint is still the 50% area time.
        assert_relative_eq!(hitlet.hitlet.width[10], 1.75);
        assert_relative_eq!(hitlet.hitlet.area_decile_from_midpoint[0], -0.875);
        assert_relative_eq!(hitlet.hitlet.area_decile_from_midpoint[5], 0.0);
    }

    #[test]
    fn test_default_fraction_grid_is_deciles() {
        let config = FeatureConfig::default();
        assert_eq!(config.fractions.len(), N_FRACTIONS);
        assert_relative_eq!(config.fractions[0], 0.0);
        assert_relative_eq!(config.fractions[10], 0.5);
        assert_relative_eq!(config.fractions[20], 1.0);
        assert_relative_eq!(config.fractions[1], 0.05);
    }

    #[test]
    fn test_first_maximum_wins_on_plateau() {
        let mut hitlet = working(vec![0.0, 3.0, 3.0, 0.0], 1);
        let _ = compute_hitlet_features(&mut hitlet, &FeatureConfig::default());
        assert_eq!(hitlet.hitlet.time_amplitude, 1);
    }

    #[test]
    fn test_batch_parallel_matches_sequential() {
        let mut batch: Vec<WorkingHitlet> = (0..64)
            .map(|i| working(vec![1.0, 2.0 + i as f32, 1.0], 1))
            .collect();
        let mut reference = batch.clone();

        let stats = compute_features(&mut batch, &FeatureConfig::default());
        for hitlet in &mut reference {
            let _ = compute_hitlet_features(hitlet, &FeatureConfig::default());
        }

        assert_eq!(stats.hitlets, 64);
        for (parallel, sequential) in batch.iter().zip(&reference) {
            assert_eq!(parallel.hitlet, sequential.hitlet);
        }
    }
}
