use ndarray::Array1;
use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Forward/inverse transform pair of one size, wrapping the `rustfft`
/// planner for reuse across acquisition cycles.
pub struct FftHelper {
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fwd = planner.plan_fft_forward(size);
        let inv = planner.plan_fft_inverse(size);
        Self { fwd, inv, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// In-place forward transform.
    pub fn forward(&self, buffer: &mut [Complex64]) {
        self.fwd.process(buffer);
    }

    /// In-place inverse transform, scaled by 1/N.
    pub fn inverse(&self, buffer: &mut [Complex64]) {
        self.inv.process(buffer);
        let scale = 1.0 / self.size as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
    }

    /// Zero-padded transform of a real signal, returning the `size / 2 + 1`
    /// non-negative-frequency bins.
    pub fn forward_real(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::zero());
        self.fwd.process(&mut buffer);
        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Inverse of a half spectrum back to `size` real samples. A spectrum
    /// shorter than `size / 2 + 1` bins is zero-padded first, so this doubles
    /// as a band-limited interpolator.
    pub fn inverse_real(&self, spectrum: &[Complex64]) -> Vec<f64> {
        let mut full = vec![Complex64::zero(); self.size];
        let bins = spectrum.len().min(self.size / 2 + 1);
        full[..bins].copy_from_slice(&spectrum[..bins]);
        for bin in 1..bins {
            full[self.size - bin] = full[bin].conj();
        }
        self.inv.process(&mut full);
        let scale = 1.0 / self.size as f64;
        full.iter().map(|value| value.re * scale).collect()
    }
}

/// Bin frequencies of a length-`n` transform over samples spaced `d` apart,
/// negative frequencies in the upper half.
pub fn fftfreq(n: usize, d: f64) -> Array1<f64> {
    let step = 1.0 / (n as f64 * d);
    Array1::from_shape_fn(n, |i| {
        let bin = if i < (n + 1) / 2 {
            i as isize
        } else {
            i as isize - n as isize
        };
        bin as f64 * step
    })
}

/// Non-negative bin frequencies of a length-`n` real-input transform.
pub fn rfftfreq(n: usize, d: f64) -> Array1<f64> {
    let step = 1.0 / (n as f64 * d);
    Array1::from_shape_fn(n / 2 + 1, |i| i as f64 * step)
}

/// Rotates the zero-frequency bin to the middle of the sequence.
pub fn fftshift<T: Clone>(values: &[T]) -> Vec<T> {
    let half = (values.len() + 1) / 2;
    let mut shifted = Vec::with_capacity(values.len());
    shifted.extend_from_slice(&values[half..]);
    shifted.extend_from_slice(&values[..half]);
    shifted
}
