use crate::config::RadarConfig;
use crate::frame::LiveFrame;
use crate::math::{fft, interp, StatsHelper};
use crate::processing::windows::TransformWindows;
use crate::telemetry::MetricsRecorder;
use log::warn;
use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::sync::Arc;

/// Transform chain turning one raw burst into a normalized range-Doppler map
/// and a single-chirp waveform.
///
/// Processing never fails a cycle: a burst of unexpected length degrades to
/// an all-zero matrix, a failed column resample leaves that column at its
/// uniform sampling, and the frame is produced either way.
pub struct RangeDopplerProcessor {
    config: RadarConfig,
    windows: TransformWindows,
    metrics: Arc<MetricsRecorder>,
}

impl RangeDopplerProcessor {
    pub fn new(config: RadarConfig, metrics: Arc<MetricsRecorder>) -> Self {
        let windows = TransformWindows::new(config.chirp_len(), &config);
        Self {
            config,
            windows,
            metrics,
        }
    }

    pub fn process(&mut self, burst: &[f64], rate: f64, cycle: u64) -> LiveFrame {
        let chirp_len = self.config.chirp_len_for(rate);
        if !self.windows.matches(chirp_len, &self.config) {
            self.windows = TransformWindows::new(chirp_len, &self.config);
        }

        let voltages = self.reshape(burst, chirp_len);
        let mut corrected = self.delay_correct(&voltages);
        if self.config.resample {
            self.resample(&mut corrected, rate);
        }
        let spectrum = self.fast_time_transform(&corrected);
        let map = normalize(self.slow_time_transform(&spectrum));
        let waveform = self.reference_waveform(&corrected);

        LiveFrame {
            map,
            waveform,
            rate,
            cycle,
        }
    }

    /// Raw burst to a chirp_len x chirp_count matrix, one chirp per column.
    fn reshape(&self, burst: &[f64], chirp_len: usize) -> Array2<f64> {
        let chirps = self.config.chirp_count;
        let expected = chirps * chirp_len;
        if burst.len() != expected {
            warn!(
                "burst length {} does not match expected {} ({} chirps x {} samples), substituting zeros",
                burst.len(),
                expected,
                chirps,
                chirp_len
            );
            self.metrics.record_degraded();
            return Array2::zeros((chirp_len, chirps));
        }
        match Array2::from_shape_vec((chirps, chirp_len), burst.to_vec()) {
            Ok(by_chirp) => by_chirp.reversed_axes(),
            Err(err) => {
                warn!("reshaping burst failed: {err}, substituting zeros");
                self.metrics.record_degraded();
                Array2::zeros((chirp_len, chirps))
            }
        }
    }

    /// Per-chirp phase ramp in the fast-time Fourier domain. The slope grows
    /// with the chirp index: the trigger-to-sample drift accumulates across
    /// the burst.
    fn delay_correct(&self, voltages: &Array2<f64>) -> Array2<f64> {
        let delay = self.config.trigger_delay();
        let freq_bins = self.windows.freq_bins();
        let mut corrected = Array2::zeros(voltages.raw_dim());
        for (index, column) in voltages.axis_iter(Axis(1)).enumerate() {
            let mut lane: Vec<Complex64> = column
                .iter()
                .map(|&value| Complex64::new(value, 0.0))
                .collect();
            self.windows.delay_fft().forward(&mut lane);
            let slope = -2.0 * PI * delay * index as f64;
            for (bin, value) in lane.iter_mut().enumerate() {
                *value *= Complex64::from_polar(1.0, slope * freq_bins[bin]);
            }
            self.windows.delay_fft().inverse(&mut lane);
            for (row, value) in lane.iter().enumerate() {
                corrected[[row, index]] = value.re;
            }
        }
        corrected
    }

    /// Interpolates each corrected chirp from its uniform sample times onto
    /// the measured nonuniform grid. A column that fails keeps its uniform
    /// sampling; the frame is produced regardless.
    fn resample(&self, corrected: &mut Array2<f64>, rate: f64) {
        let grid = match self.config.resample_grid.as_deref() {
            Some(grid) => grid,
            None => {
                warn!("resampling requested but no reference grid is configured");
                return;
            }
        };
        let chirp_len = corrected.nrows();
        if grid.len() != chirp_len {
            warn!(
                "resample grid has {} points but chirps carry {} samples, skipping",
                grid.len(),
                chirp_len
            );
            self.metrics.record_resample_skip();
            return;
        }
        let times: Vec<f64> = (0..chirp_len).map(|i| i as f64 / rate).collect();
        for index in 0..corrected.ncols() {
            let column = corrected.column(index).to_vec();
            match interp::interp_onto(grid, &times, &column) {
                Ok(values) => {
                    for (row, value) in values.into_iter().enumerate() {
                        corrected[[row, index]] = value;
                    }
                }
                Err(err) => {
                    warn!("resampling chirp {index} failed: {err}");
                    self.metrics.record_resample_skip();
                }
            }
        }
    }

    /// Windowed, zero-padded real transform along fast time: one range
    /// spectrum per chirp.
    fn fast_time_transform(&self, corrected: &Array2<f64>) -> Array2<Complex64> {
        let rows = self.windows.range_bins();
        let mut spectrum = Array2::zeros((rows, corrected.ncols()));
        let window = self.windows.fast_window();
        for (index, column) in corrected.axis_iter(Axis(1)).enumerate() {
            let windowed: Vec<f64> = column
                .iter()
                .zip(window.iter())
                .map(|(&value, &weight)| value * weight)
                .collect();
            let lane = self.windows.range_fft().forward_real(&windowed);
            for (row, value) in lane.into_iter().enumerate() {
                spectrum[[row, index]] = value;
            }
        }
        spectrum
    }

    /// Windowed, zero-padded transform across chirps, shifted so zero Doppler
    /// sits in the middle column. Returns magnitudes.
    fn slow_time_transform(&self, spectrum: &Array2<Complex64>) -> Array2<f64> {
        let cols = self.windows.doppler_bins();
        let mut map = Array2::zeros((spectrum.nrows(), cols));
        let window = self.windows.slow_window();
        for (row, lane_in) in spectrum.axis_iter(Axis(0)).enumerate() {
            let mut lane: Vec<Complex64> = lane_in
                .iter()
                .zip(window.iter())
                .map(|(&value, &weight)| value * weight)
                .collect();
            lane.resize(cols, Complex64::default());
            self.windows.doppler_fft().forward(&mut lane);
            for (col, value) in fft::fftshift(&lane).into_iter().enumerate() {
                map[[row, col]] = value.norm();
            }
        }
        map
    }

    /// One fixed reference chirp, band-limit interpolated, DC-removed and
    /// peak-normalized.
    fn reference_waveform(&self, corrected: &Array2<f64>) -> Array1<f64> {
        let column = corrected.column(self.config.reference_chirp).to_vec();
        let spectrum = self.windows.delay_fft().forward_real(&column);
        let mut waveform = self.windows.waveform_fft().inverse_real(&spectrum);
        let mean = StatsHelper::mean(&waveform);
        for value in waveform.iter_mut() {
            *value -= mean;
        }
        let peak = StatsHelper::peak_abs(&waveform);
        for value in waveform.iter_mut() {
            *value /= peak;
        }
        Array1::from_vec(waveform)
    }
}

/// Shifts the frame minimum to zero and scales the shifted maximum to one.
/// An all-equal frame divides zero by zero and turns NaN throughout; that
/// edge is pinned by `zero_burst_yields_nan_map` rather than special-cased.
fn normalize(mut map: Array2<f64>) -> Array2<f64> {
    let min = map.iter().copied().fold(f64::INFINITY, f64::min);
    map.mapv_inplace(|value| value - min);
    let max = map.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    map.mapv_inplace(|value| value / max);
    map
}
