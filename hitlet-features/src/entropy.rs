//! Conditional entropy of waveform shapes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference template the normalized waveform is compared against.
///
/// Only the flat template is supported; the variant exists so the
/// template stays an explicit parameter of the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntropyTemplate {
    /// Uniform template `1/n` over the hitlet's valid samples.
    #[default]
    Flat,
}

/// Computes the conditional Shannon entropy of a waveform against a
/// template.
///
/// The waveform is normalized by its total (of squared samples when
/// `square_data` is set) into a probability-like distribution `p`; the
/// result is `-sum(p_i * ln(p_i / t_i))` over strictly positive `p_i`,
/// with `t` the template distribution. Returns `None` when the entropy
/// is undefined: an empty waveform, a non-positive or non-finite total,
/// or a non-finite result. Callers default the field instead of
/// failing; waveforms with negative excursions are expected here.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn conditional_entropy(data: &[f32], template: EntropyTemplate, square_data: bool) -> Option<f32> {
    if data.is_empty() {
        return None;
    }

    let weight = |s: f32| {
        let s = f64::from(s);
        if square_data {
            s * s
        } else {
            s
        }
    };

    let total: f64 = data.iter().map(|&s| weight(s)).sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let flat = 1.0 / data.len() as f64;
    let EntropyTemplate::Flat = template;

    let mut entropy = 0.0;
    for &s in data {
        let p = weight(s) / total;
        if p > 0.0 {
            entropy -= p * (p / flat).ln();
        }
    }

    entropy.is_finite().then_some(entropy as f32)
}
