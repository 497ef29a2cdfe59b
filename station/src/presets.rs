use fmcwcore::config::{DisplayWindow, RadarConfig};
use fmcwcore::hardware::SamplerKind;

/// Built-in bandwidth profiles, named by the sweep span at the generator.
pub const NAMES: [&str; 4] = ["200m", "600m", "1g", "140m"];

/// Looks a profile up by name. All profiles run the simulated sampler at
/// 500 kS/s with 20 chirps per burst; they differ in sweep span, sweep
/// duration and interpolation depth. The 1 GHz profile is the one flown with
/// nonuniform resampling, but its measured sample-time grid ships as data, so
/// enabling that means loading a settings file that carries the grid.
pub fn lookup(name: &str) -> Option<RadarConfig> {
    match name {
        "200m" => Some(profile(0.61e-3, 0.617016e-3, 200e6, 2, 4, 128)),
        "600m" => Some(profile(0.9e-3, 0.9027243e-3, 600e6, 5, 4, 8)),
        "1g" => Some(profile(1.5e-3, 1.504538e-3, 1000e6, 5, 4, 8)),
        "140m" => Some(profile(0.2e-3, 0.2007509e-3, 140e6, 2, 4, 128)),
        _ => None,
    }
}

fn profile(
    chirp_duration: f64,
    real_chirp_duration: f64,
    generator_bandwidth: f64,
    range_interp: usize,
    doppler_interp: usize,
    waveform_interp: usize,
) -> RadarConfig {
    RadarConfig {
        sampler: SamplerKind::Simulated,
        sample_rate: 500_000.0,
        chirp_duration,
        real_chirp_duration,
        chirp_count: 20,
        generator_bandwidth,
        frequency_multiplier: 18.0,
        base_frequency: 15e9,
        range_interp,
        doppler_interp,
        waveform_interp,
        reference_chirp: 1,
        resample: false,
        resample_grid: None,
        poll_interval_secs: 0.001,
        poll_timeout_secs: 5.0,
        cycle_pause_secs: 0.08,
        display: DisplayWindow::default(),
    }
}
