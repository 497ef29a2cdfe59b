use crate::bridge::BridgeSettings;
use crate::presets;
use anyhow::Context;
use fmcwcore::config::RadarConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full station settings: the radar session parameters plus the live-view
/// endpoint options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSettings {
    pub radar: RadarConfig,
    #[serde(default)]
    pub bridge: BridgeSettings,
}

impl StationSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading station settings {}", path_ref.display()))?;
        let settings: StationSettings = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing station settings {}", path_ref.display()))?;
        settings
            .radar
            .validate()
            .with_context(|| format!("validating station settings {}", path_ref.display()))?;
        Ok(settings)
    }

    pub fn from_preset(name: &str) -> anyhow::Result<Self> {
        let radar = presets::lookup(name).with_context(|| {
            format!(
                "unknown preset '{name}', expected one of {}",
                presets::NAMES.join(", ")
            )
        })?;
        Ok(Self {
            radar,
            bridge: BridgeSettings::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn settings_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"radar:\n  sampler: simulated\n  sample_rate: 500000\n  chirp_duration: 0.00061\n  real_chirp_duration: 0.000617016\n  chirp_count: 20\n  generator_bandwidth: 200000000\n  range_interp: 2\n  doppler_interp: 4\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let settings = StationSettings::load(&path).unwrap();
        assert_eq!(settings.radar.chirp_count, 20);
        assert_eq!(settings.radar.chirp_len(), 305);
        // omitted fields fall back to their defaults
        assert_eq!(settings.radar.reference_chirp, 1);
        assert_eq!(settings.bridge.listen.port(), 9000);
    }

    #[test]
    fn settings_load_rejects_invalid_bundles() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"radar:\n  sampler: simulated\n  sample_rate: 500000\n  chirp_duration: 0.00061\n  real_chirp_duration: 0.000617016\n  chirp_count: 20\n  generator_bandwidth: 200000000\n  range_interp: 2\n  doppler_interp: 4\n  resample: true\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        // resample without a grid must not start a session
        assert!(StationSettings::load(&path).is_err());
    }

    #[test]
    fn preset_settings_carry_defaults() {
        let settings = StationSettings::from_preset("600m").unwrap();
        assert_eq!(settings.radar.chirp_len(), 450);
        assert!(StationSettings::from_preset("no-such").is_err());
    }
}
