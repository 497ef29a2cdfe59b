use crate::prelude::{RadarError, RadarResult};

/// Linear interpolation of the sampled `(times, values)` curve onto `grid`,
/// clamping to the first/last value outside the sampled interval. `times`
/// must be ascending.
pub fn interp_onto(grid: &[f64], times: &[f64], values: &[f64]) -> RadarResult<Vec<f64>> {
    if times.len() != values.len() {
        return Err(RadarError::Resample(format!(
            "time axis has {} points, data has {}",
            times.len(),
            values.len()
        )));
    }
    if times.is_empty() {
        return Err(RadarError::Resample("empty sample axis".into()));
    }
    if times.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(RadarError::Resample("sample axis is not ascending".into()));
    }
    Ok(grid.iter().map(|&x| interp_one(x, times, values)).collect())
}

fn interp_one(x: f64, times: &[f64], values: &[f64]) -> f64 {
    let last = times.len() - 1;
    if x <= times[0] {
        return values[0];
    }
    if x >= times[last] {
        return values[last];
    }
    let hi = times.partition_point(|&t| t <= x);
    let lo = hi - 1;
    let span = times[hi] - times[lo];
    if span == 0.0 {
        return values[lo];
    }
    values[lo] + (values[hi] - values[lo]) * (x - times[lo]) / span
}
