use crate::prelude::RadarResult;

/// Capability interface of the chirp-generating instrument. Every command is
/// repeatable; the byte-level command set lives in the driver behind it.
pub trait Generator: Send + Sync {
    fn connect(&mut self) -> RadarResult<()>;

    /// One-time sweep setup before the output is enabled: chirp duration in
    /// seconds and sweep span in Hz, both at the generator.
    fn configure(&mut self, chirp_duration: f64, bandwidth: f64) -> RadarResult<()>;

    /// Turns the RF output on.
    fn enable(&mut self) -> RadarResult<()>;

    /// Emits an immediate trigger.
    fn fire(&mut self) -> RadarResult<()>;

    /// Turns the RF output off.
    fn off(&mut self) -> RadarResult<()>;

    fn close(&mut self) -> RadarResult<()>;
}
