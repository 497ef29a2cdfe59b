use fmcwcore::config::RadarConfig;
use fmcwcore::hardware::Sampler;
use fmcwcore::prelude::{RadarResult, ScanStatus};
use fmcwcore::view::SPEED_OF_LIGHT;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;
use std::time::{Duration, Instant};

/// Software stand-in for the sampling hardware.
///
/// A point target bounces between 1 m and 3 m at 0.4 m/s; each burst carries
/// the beat tone that range produces under the configured sweep, a per-chirp
/// Doppler phase increment for the velocity, and a little noise. Status
/// follows the real handshake: Running from arm until the capture window has
/// elapsed, Idle afterwards.
pub struct SimulatedSampler {
    sample_rate: f64,
    chirp_duration: f64,
    chirp_count: usize,
    bandwidth: f64,
    center_frequency: f64,
    noise: f64,
    range_m: f64,
    velocity_mps: f64,
    direction: f64,
    last_update: Instant,
    armed_at: Option<Instant>,
    rng: StdRng,
}

impl SimulatedSampler {
    pub fn new(config: &RadarConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            chirp_duration: config.chirp_duration,
            chirp_count: config.chirp_count,
            bandwidth: config.bandwidth(),
            center_frequency: config.center_frequency(),
            noise: 0.02,
            range_m: 2.0,
            velocity_mps: 0.4,
            direction: 1.0,
            last_update: Instant::now(),
            armed_at: None,
            rng: StdRng::seed_from_u64(7),
        }
    }

    fn capture_window(&self) -> Duration {
        Duration::from_secs_f64(self.chirp_duration * self.chirp_count as f64)
    }

    fn advance_target(&mut self) {
        let now = Instant::now();
        let step = now.duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        self.range_m += self.direction * self.velocity_mps * step;
        if self.range_m >= 3.0 {
            self.direction = -1.0;
        }
        if self.range_m <= 1.0 {
            self.direction = 1.0;
        }
    }

    /// Beat frequency of the current target range under the sweep slope.
    pub fn beat_frequency(&self) -> f64 {
        2.0 * self.bandwidth * self.range_m / (SPEED_OF_LIGHT * self.chirp_duration)
    }

    fn synthesize(&mut self) -> Vec<f64> {
        self.advance_target();
        let chirp_len = (self.chirp_duration * self.sample_rate).round() as usize;
        let beat = self.beat_frequency();
        let wavelength = SPEED_OF_LIGHT / self.center_frequency;
        let doppler_step =
            4.0 * PI * self.direction * self.velocity_mps * self.chirp_duration / wavelength;

        let mut burst = Vec::with_capacity(self.chirp_count * chirp_len);
        for chirp in 0..self.chirp_count {
            let phase = chirp as f64 * doppler_step;
            for sample in 0..chirp_len {
                let t = sample as f64 / self.sample_rate;
                let jitter = self.rng.gen_range(-self.noise..self.noise);
                burst.push((2.0 * PI * beat * t + phase).sin() + jitter);
            }
        }
        burst
    }
}

impl Sampler for SimulatedSampler {
    fn connect(&mut self) -> RadarResult<()> {
        Ok(())
    }

    fn disconnect(&mut self) -> RadarResult<()> {
        Ok(())
    }

    fn release(&mut self) -> RadarResult<()> {
        Ok(())
    }

    fn arm_scan(&mut self) -> RadarResult<f64> {
        self.armed_at = Some(Instant::now());
        Ok(self.sample_rate)
    }

    fn scan_status(&mut self) -> ScanStatus {
        match self.armed_at {
            Some(armed) if armed.elapsed() < self.capture_window() => ScanStatus::Running,
            _ => ScanStatus::Idle,
        }
    }

    fn stop_scan(&mut self) -> RadarResult<()> {
        self.armed_at = None;
        Ok(())
    }

    fn read_burst(&mut self) -> RadarResult<Vec<f64>> {
        self.armed_at = None;
        Ok(self.synthesize())
    }
}
