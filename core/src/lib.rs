//! Acquisition and range-Doppler processing core for the FMCW live radar
//! console.
//!
//! The crate couples a per-cycle hardware handshake (arm the sampler, fire the
//! chirp generator, poll for completion) with the transform chain that turns
//! one raw burst into a normalized range-Doppler map and a single-chirp
//! waveform, and publishes the latest result to an independently paced
//! display consumer.

pub mod acquisition;
pub mod config;
pub mod frame;
pub mod hardware;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;
pub mod view;

pub use prelude::{RadarError, RadarResult, ScanStatus};
