pub mod simulated;

use fmcwcore::config::RadarConfig;
use fmcwcore::hardware::{Sampler, SamplerKind};
use fmcwcore::prelude::{RadarError, RadarResult};
use simulated::SimulatedSampler;

/// Instantiates the sampler driver the configuration selects. The vendor
/// drivers bind proprietary acquisition libraries that are absent from this
/// build; asking for one reports `DriverUnavailable` instead of silently
/// substituting the simulation.
pub fn build_sampler(config: &RadarConfig) -> RadarResult<Box<dyn Sampler>> {
    match config.sampler {
        SamplerKind::Simulated => Ok(Box::new(SimulatedSampler::new(config))),
        SamplerKind::Uldaq => Err(RadarError::DriverUnavailable("uldaq")),
        SamplerKind::Mcculw => Err(RadarError::DriverUnavailable("mcculw")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn simulated_driver_is_available() {
        let config = presets::lookup("200m").unwrap();
        assert!(build_sampler(&config).is_ok());
    }

    #[test]
    fn vendor_drivers_report_unavailable() {
        let mut config = presets::lookup("200m").unwrap();
        config.sampler = SamplerKind::Uldaq;
        assert!(matches!(
            build_sampler(&config),
            Err(RadarError::DriverUnavailable("uldaq"))
        ));
    }
}
