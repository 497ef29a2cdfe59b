use std::time::Duration;

/// Scan state reported by a sampler device.
///
/// The hardware exposes no event notification, only this polled status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Running,
}

/// Common error type for session construction and the acquisition cycle.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("sampler connection failed: {0}")]
    Connect(String),
    #[error("arming scan failed: {0}")]
    Arm(String),
    #[error("reading burst failed: {0}")]
    Read(String),
    #[error("resample failed: {0}")]
    Resample(String),
    #[error("generator command failed: {0}")]
    Generator(String),
    #[error("driver '{0}' is not available in this build")]
    DriverUnavailable(&'static str),
    #[error("sampler did not report {wanted:?} within {waited:?}")]
    PollTimeout { wanted: ScanStatus, waited: Duration },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type RadarResult<T> = Result<T, RadarError>;
