use crate::config::RadarConfig;
use crate::math::fft::{self, FftHelper};
use crate::math::window;
use ndarray::Array1;

/// Cached per-session transform state: the fast-time frequency axis, the
/// fast/slow Hamming windows and the planned transforms of every size the
/// pipeline touches. Rebuilt whenever the chirp length implied by the
/// achieved sample rate, or an interpolation factor, changes.
pub struct TransformWindows {
    chirp_len: usize,
    range_interp: usize,
    doppler_interp: usize,
    waveform_interp: usize,
    freq_bins: Array1<f64>,
    fast_window: Array1<f64>,
    slow_window: Array1<f64>,
    delay_fft: FftHelper,
    range_fft: FftHelper,
    doppler_fft: FftHelper,
    waveform_fft: FftHelper,
}

impl TransformWindows {
    pub fn new(chirp_len: usize, config: &RadarConfig) -> Self {
        let fast_size = chirp_len * config.range_interp;
        let slow_size = config.chirp_count * config.doppler_interp;
        Self {
            chirp_len,
            range_interp: config.range_interp,
            doppler_interp: config.doppler_interp,
            waveform_interp: config.waveform_interp,
            freq_bins: fft::fftfreq(chirp_len, 1.0 / config.sample_rate),
            fast_window: window::hamming(chirp_len),
            slow_window: window::hamming(config.chirp_count),
            delay_fft: FftHelper::new(chirp_len),
            range_fft: FftHelper::new(fast_size),
            doppler_fft: FftHelper::new(slow_size),
            waveform_fft: FftHelper::new(chirp_len * config.waveform_interp),
        }
    }

    /// True while the cached state still fits the given chirp length and the
    /// configured interpolation factors.
    pub fn matches(&self, chirp_len: usize, config: &RadarConfig) -> bool {
        self.chirp_len == chirp_len
            && self.range_interp == config.range_interp
            && self.doppler_interp == config.doppler_interp
            && self.waveform_interp == config.waveform_interp
    }

    pub fn chirp_len(&self) -> usize {
        self.chirp_len
    }

    /// Range bins of the zero-padded fast-time transform.
    pub fn range_bins(&self) -> usize {
        self.range_fft.size() / 2 + 1
    }

    /// Doppler bins of the zero-padded slow-time transform.
    pub fn doppler_bins(&self) -> usize {
        self.doppler_fft.size()
    }

    pub fn freq_bins(&self) -> &Array1<f64> {
        &self.freq_bins
    }

    pub fn fast_window(&self) -> &Array1<f64> {
        &self.fast_window
    }

    pub fn slow_window(&self) -> &Array1<f64> {
        &self.slow_window
    }

    pub fn delay_fft(&self) -> &FftHelper {
        &self.delay_fft
    }

    pub fn range_fft(&self) -> &FftHelper {
        &self.range_fft
    }

    pub fn doppler_fft(&self) -> &FftHelper {
        &self.doppler_fft
    }

    pub fn waveform_fft(&self) -> &FftHelper {
        &self.waveform_fft
    }
}
