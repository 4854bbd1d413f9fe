//! Per-channel calibration configuration.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of detector channels (TPC PMTs 0..494).
pub const DEFAULT_N_CHANNELS: u16 = 494;

/// Per-channel calibration for hitlet materialization.
///
/// Holds the `to_pe` gain table converting raw ADC counts to
/// photoelectron-equivalent units, plus the list of valid channels kept
/// for bookkeeping. Gains default to 1.0 for every channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationConfig {
    /// Gain per channel id, indexed by channel.
    pub to_pe: Vec<f32>,
    /// Valid channel ids. Not enforced against hits; informational.
    pub channels: Vec<u16>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_N_CHANNELS)
    }
}

impl CalibrationConfig {
    /// Unit gains for channels `0..n_channels`.
    #[must_use]
    pub fn uniform(n_channels: u16) -> Self {
        Self {
            to_pe: vec![1.0; n_channels as usize],
            channels: (0..n_channels).collect(),
        }
    }

    /// Builds a configuration from an explicit gain table, channel ids
    /// `0..gains.len()`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the table would not fit in the
    /// channel id space.
    pub fn from_gains(gains: Vec<f32>) -> Result<Self> {
        if gains.len() > usize::from(u16::MAX) + 1 {
            return Err(Error::Config(format!(
                "gain table holds {} entries, more than the channel id space",
                gains.len()
            )));
        }
        #[allow(clippy::cast_possible_truncation)]
        let channels = (0..gains.len() as u16).collect();
        Ok(Self {
            to_pe: gains,
            channels,
        })
    }

    /// Replaces the gain table.
    #[must_use]
    pub fn with_to_pe(mut self, to_pe: Vec<f32>) -> Self {
        self.to_pe = to_pe;
        self
    }

    /// Replaces the valid channel list.
    #[must_use]
    pub fn with_channels(mut self, channels: Vec<u16>) -> Self {
        self.channels = channels;
        self
    }

    /// Number of channels covered by the gain table.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.to_pe.len()
    }

    /// Looks up the gain for a channel.
    ///
    /// # Errors
    /// Returns [`Error::MissingGain`] when the channel is outside the
    /// gain table.
    pub fn gain(&self, channel: u16) -> Result<f32> {
        self.to_pe
            .get(usize::from(channel))
            .copied()
            .ok_or(Error::MissingGain(channel))
    }
}
