use ndarray::Array1;
use std::f64::consts::PI;

/// Symmetric Hamming window, endpoints at 0.08.
pub fn hamming(length: usize) -> Array1<f64> {
    if length == 0 {
        return Array1::zeros(0);
    }
    if length == 1 {
        return Array1::ones(1);
    }
    let span = (length - 1) as f64;
    Array1::from_shape_fn(length, |i| {
        0.54 - 0.46 * (2.0 * PI * i as f64 / span).cos()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_is_symmetric_with_unit_peak() {
        let window = hamming(9);
        assert!((window[0] - 0.08).abs() < 1e-12);
        assert!((window[8] - 0.08).abs() < 1e-12);
        assert!((window[4] - 1.0).abs() < 1e-12);
        for i in 0..4 {
            assert!((window[i] - window[8 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn hamming_degenerate_lengths() {
        assert_eq!(hamming(0).len(), 0);
        assert_eq!(hamming(1).to_vec(), vec![1.0]);
    }
}
