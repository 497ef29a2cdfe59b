use crate::prelude::{RadarResult, ScanStatus};
use serde::{Deserialize, Serialize};

/// Driver variant of the sampling device, chosen once at session
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    Simulated,
    Uldaq,
    Mcculw,
}

/// Capability interface of the sampling device.
///
/// `connect`, `disconnect` and `release` are idempotent and safe to call
/// even when the device was never armed. The device exposes no event
/// notification; completion is observed by polling `scan_status`.
pub trait Sampler: Send + Sync {
    fn connect(&mut self) -> RadarResult<()>;
    fn disconnect(&mut self) -> RadarResult<()>;
    fn release(&mut self) -> RadarResult<()>;

    /// Starts one burst capture and returns the achieved sample rate, which
    /// may differ from the requested one.
    fn arm_scan(&mut self) -> RadarResult<f64>;

    /// Polled status; never fails, it only reports.
    fn scan_status(&mut self) -> ScanStatus;

    fn stop_scan(&mut self) -> RadarResult<()>;

    /// Reads the completed capture, `chirp_count * chirp_len` samples.
    fn read_burst(&mut self) -> RadarResult<Vec<f64>>;
}
