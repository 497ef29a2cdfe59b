use crate::config::RadarConfig;
use crate::math::fft;
use ndarray::Array2;

/// Propagation speed used for the axis scaling, m/s.
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Physical axes of the range-Doppler map plus the row/column masks that
/// restrict it to the configured distance and velocity display windows.
/// Computed once per session from the configuration.
#[derive(Debug, Clone)]
pub struct ViewGeometry {
    range_axis: Vec<f64>,
    velocity_axis: Vec<f64>,
    range_rows: Vec<usize>,
    velocity_cols: Vec<usize>,
}

impl ViewGeometry {
    pub fn from_config(config: &RadarConfig) -> Self {
        let window = &config.display;

        let doppler_bins = config.chirp_count * config.doppler_interp;
        let velocity_axis: Vec<f64> = {
            let freqs = fft::fftfreq(doppler_bins, config.chirp_duration);
            let scaled: Vec<f64> = freqs
                .iter()
                .map(|f| SPEED_OF_LIGHT / 2.0 * f / config.center_frequency())
                .collect();
            fft::fftshift(&scaled)
        };

        // the beat-frequency axis maps onto distance through the sweep slope,
        // which follows the measured (not nominal) chirp duration
        let range_axis: Vec<f64> = fft::rfftfreq(
            config.chirp_len() * config.range_interp,
            1.0 / config.sample_rate,
        )
        .iter()
        .map(|f| SPEED_OF_LIGHT / 2.0 * f / config.bandwidth() * config.real_chirp_duration)
        .collect();

        let range_rows = range_axis
            .iter()
            .enumerate()
            .filter(|(_, &r)| r >= window.min_range && r <= window.max_range)
            .map(|(row, _)| row)
            .collect();

        // the velocity window is symmetric about zero and never wider than
        // the axis itself
        let edge = velocity_axis
            .first()
            .map(|v| v.abs())
            .unwrap_or(0.0)
            .min(velocity_axis.last().map(|v| v.abs()).unwrap_or(0.0));
        let limit = edge
            .min(window.min_velocity.abs())
            .min(window.max_velocity.abs());
        let velocity_cols = velocity_axis
            .iter()
            .enumerate()
            .filter(|(_, &v)| v >= -limit && v <= limit)
            .map(|(col, _)| col)
            .collect();

        Self {
            range_axis,
            velocity_axis,
            range_rows,
            velocity_cols,
        }
    }

    /// Distance values of the rows inside the display window, in meters.
    pub fn masked_range_axis(&self) -> Vec<f64> {
        self.range_rows.iter().map(|&row| self.range_axis[row]).collect()
    }

    /// Velocity values of the columns inside the display window, in m/s.
    pub fn masked_velocity_axis(&self) -> Vec<f64> {
        self.velocity_cols
            .iter()
            .map(|&col| self.velocity_axis[col])
            .collect()
    }

    /// Applies the row and column masks to a full map.
    pub fn masked_map(&self, map: &Array2<f64>) -> Array2<f64> {
        Array2::from_shape_fn(
            (self.range_rows.len(), self.velocity_cols.len()),
            |(i, j)| map[[self.range_rows[i], self.velocity_cols[j]]],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayWindow;
    use crate::hardware::SamplerKind;

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
    fn axes_match_the_map_shape() {
        let cfg = config();
        let geometry = ViewGeometry::from_config(&cfg);
        let (rows, cols) = cfg.map_shape();
        assert_eq!(geometry.range_axis.len(), rows);
        assert_eq!(geometry.velocity_axis.len(), cols);
    }

    #[test]
    fn masks_select_only_in_window_bins() {
        let cfg = config();
        let geometry = ViewGeometry::from_config(&cfg);
        assert!(!geometry.masked_range_axis().is_empty());
        for distance in geometry.masked_range_axis() {
            assert!((1.0..=3.0).contains(&distance));
        }
        for velocity in geometry.masked_velocity_axis() {
            assert!((-5.0..=5.0).contains(&velocity));
        }
    }

    #[test]
    fn velocity_mask_is_symmetric_about_zero() {
        let geometry = ViewGeometry::from_config(&config());
        let velocities = geometry.masked_velocity_axis();
        let first = velocities.first().copied().unwrap();
        let last = velocities.last().copied().unwrap();
        assert!((first + last).abs() < 1e-9);
    }

    #[test]
    fn masked_map_picks_the_windowed_cells() {
        let cfg = config();
        let geometry = ViewGeometry::from_config(&cfg);
        let (rows, cols) = cfg.map_shape();
        let map = Array2::from_shape_fn((rows, cols), |(i, j)| (i * cols + j) as f64);
        let masked = geometry.masked_map(&map);
        assert_eq!(
            masked.dim(),
            (geometry.range_rows.len(), geometry.velocity_cols.len())
        );
        assert_eq!(
            masked[[0, 0]],
            map[[geometry.range_rows[0], geometry.velocity_cols[0]]]
        );
    }
}
