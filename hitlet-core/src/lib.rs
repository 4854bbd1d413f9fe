//! hitlet-core: Core types for detector waveform hitlet processing.
//!
//! This crate provides the foundational types for turning lone hits
//! found in raw waveform records into fixed-width hitlet feature
//! records: records, hits, hitlets, calibration tables and error types.
//!

pub mod calibration;
pub mod error;
pub mod hit;
pub mod hitlet;
pub mod record;

pub use calibration::{CalibrationConfig, DEFAULT_N_CHANNELS};
pub use error::{Error, Result};
pub use hit::LoneHit;
pub use hitlet::{FeatureStatistics, Hitlet, WorkingHitlet, N_DECILES};
pub use record::WaveformRecord;
