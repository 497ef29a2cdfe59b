use crate::config::RadarConfig;
use ndarray::{Array1, Array2};

/// Processed outputs of one acquisition cycle: the normalized range-Doppler
/// map, the reference-chirp waveform, and the rate the burst was captured at.
/// The publisher keeps only the newest instance.
#[derive(Debug, Clone)]
pub struct LiveFrame {
    pub map: Array2<f64>,
    pub waveform: Array1<f64>,
    pub rate: f64,
    pub cycle: u64,
}

impl LiveFrame {
    /// Blank frame of the shape the configuration implies, shown until the
    /// first cycle completes.
    pub fn zeroed(config: &RadarConfig) -> Self {
        let (rows, cols) = config.map_shape();
        Self {
            map: Array2::zeros((rows, cols)),
            waveform: Array1::zeros(config.chirp_len() * config.waveform_interp),
            rate: config.sample_rate,
            cycle: 0,
        }
    }
}
