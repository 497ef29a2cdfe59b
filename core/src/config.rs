use crate::hardware::SamplerKind;
use crate::prelude::{RadarError, RadarResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Distance and velocity limits of the live display, in meters and meters
/// per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub min_range: f64,
    pub max_range: f64,
    pub min_velocity: f64,
    pub max_velocity: f64,
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self {
            min_range: 1.0,
            max_range: 3.0,
            min_velocity: -5.0,
            max_velocity: 5.0,
        }
    }
}

/// Parameter bundle for one acquisition session. Constructed once, validated
/// at session start and never mutated afterwards; changing any field means a
/// full stop and a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    pub sampler: SamplerKind,
    /// Requested sample rate in S/s; the sampler reports the achieved one.
    pub sample_rate: f64,
    /// Nominal sweep duration in seconds.
    pub chirp_duration: f64,
    /// Measured sweep duration of the generator, in seconds.
    pub real_chirp_duration: f64,
    pub chirp_count: usize,
    /// Sweep span at the generator, in Hz, before frequency multiplication.
    pub generator_bandwidth: f64,
    #[serde(default = "default_frequency_multiplier")]
    pub frequency_multiplier: f64,
    /// Carrier at the generator, in Hz, before frequency multiplication.
    #[serde(default = "default_base_frequency")]
    pub base_frequency: f64,
    pub range_interp: usize,
    pub doppler_interp: usize,
    #[serde(default = "default_waveform_interp")]
    pub waveform_interp: usize,
    /// Chirp column shown as the time waveform.
    #[serde(default = "default_reference_chirp")]
    pub reference_chirp: usize,
    #[serde(default)]
    pub resample: bool,
    /// Measured nonuniform sample-time grid the corrected chirps are
    /// interpolated onto when `resample` is set.
    #[serde(default)]
    pub resample_grid: Option<Vec<f64>>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: f64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: f64,
    #[serde(default = "default_cycle_pause_secs")]
    pub cycle_pause_secs: f64,
    #[serde(default)]
    pub display: DisplayWindow,
}

fn default_frequency_multiplier() -> f64 {
    18.0
}

fn default_base_frequency() -> f64 {
    15e9
}

fn default_waveform_interp() -> usize {
    1
}

fn default_reference_chirp() -> usize {
    1
}

fn default_poll_interval_secs() -> f64 {
    0.001
}

fn default_poll_timeout_secs() -> f64 {
    5.0
}

fn default_cycle_pause_secs() -> f64 {
    0.08
}

impl RadarConfig {
    /// Sweep span after frequency multiplication, in Hz.
    pub fn bandwidth(&self) -> f64 {
        self.generator_bandwidth * self.frequency_multiplier
    }

    /// Carrier after frequency multiplication, in Hz.
    pub fn center_frequency(&self) -> f64 {
        self.base_frequency * self.frequency_multiplier
    }

    /// Cumulative trigger-to-sample drift per chirp, in seconds. Negative
    /// when the generator sweeps longer than nominal.
    pub fn trigger_delay(&self) -> f64 {
        self.chirp_duration - self.real_chirp_duration
    }

    /// Samples per chirp at the requested rate.
    pub fn chirp_len(&self) -> usize {
        self.chirp_len_for(self.sample_rate)
    }

    /// Samples per chirp at the achieved rate reported by the sampler.
    pub fn chirp_len_for(&self, rate: f64) -> usize {
        ((self.chirp_duration * rate).round() as usize).max(1)
    }

    /// Expected raw burst length at the requested rate.
    pub fn burst_len(&self) -> usize {
        self.chirp_count * self.chirp_len()
    }

    /// Shape of the range-Doppler map at the requested rate: range bins down,
    /// Doppler bins across.
    pub fn map_shape(&self) -> (usize, usize) {
        (
            self.chirp_len() * self.range_interp / 2 + 1,
            self.chirp_count * self.doppler_interp,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.poll_timeout_secs)
    }

    pub fn cycle_pause(&self) -> Duration {
        Duration::from_secs_f64(self.cycle_pause_secs)
    }

    pub fn validate(&self) -> RadarResult<()> {
        if !(self.sample_rate > 0.0) {
            return Err(RadarError::InvalidConfig("sample_rate must be positive".into()));
        }
        if !(self.chirp_duration > 0.0) || !(self.real_chirp_duration > 0.0) {
            return Err(RadarError::InvalidConfig(
                "chirp durations must be positive".into(),
            ));
        }
        if self.chirp_count == 0 {
            return Err(RadarError::InvalidConfig("chirp_count must be nonzero".into()));
        }
        if self.range_interp == 0 || self.doppler_interp == 0 || self.waveform_interp == 0 {
            return Err(RadarError::InvalidConfig(
                "interpolation factors must be at least 1".into(),
            ));
        }
        if self.reference_chirp >= self.chirp_count {
            return Err(RadarError::InvalidConfig(format!(
                "reference_chirp {} is out of range for {} chirps",
                self.reference_chirp, self.chirp_count
            )));
        }
        if self.resample && self.resample_grid.as_ref().map_or(true, Vec::is_empty) {
            return Err(RadarError::InvalidConfig(
                "resample requested without a reference grid".into(),
            ));
        }
        if !(self.poll_interval_secs > 0.0) || !(self.poll_timeout_secs > 0.0) {
            return Err(RadarError::InvalidConfig(
                "poll interval and timeout must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RadarConfig {
        RadarConfig {
            sampler: SamplerKind::Simulated,
            sample_rate: 500_000.0,
            chirp_duration: 0.61e-3,
            real_chirp_duration: 0.617016e-3,
            chirp_count: 20,
            generator_bandwidth: 200e6,
            frequency_multiplier: 18.0,
            base_frequency: 15e9,
            range_interp: 2,
            doppler_interp: 4,
            waveform_interp: 1,
            reference_chirp: 1,
            resample: false,
            resample_grid: None,
            poll_interval_secs: 0.001,
            poll_timeout_secs: 5.0,
            cycle_pause_secs: 0.08,
            display: DisplayWindow::default(),
        }
    }

    #[test]
    fn derived_quantities_follow_the_profile() {
        let cfg = config();
        assert_eq!(cfg.chirp_len(), 305);
        assert_eq!(cfg.burst_len(), 20 * 305);
        assert_eq!(cfg.map_shape(), (306, 80));
        assert!((cfg.bandwidth() - 3.6e9).abs() < 1.0);
        assert!((cfg.center_frequency() - 270e9).abs() < 1.0);
        assert!(cfg.trigger_delay() < 0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn chirp_len_tracks_the_achieved_rate() {
        let cfg = config();
        assert_eq!(cfg.chirp_len_for(400_000.0), 244);
        assert_eq!(cfg.chirp_len_for(0.0), 1);
    }

    #[test]
    fn validate_rejects_reference_chirp_out_of_range() {
        let mut cfg = config();
        cfg.reference_chirp = 20;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_resample_without_grid() {
        let mut cfg = config();
        cfg.resample = true;
        assert!(cfg.validate().is_err());
        cfg.resample_grid = Some(vec![0.0, 1.0]);
        assert!(cfg.validate().is_ok());
    }
}
