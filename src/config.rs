//! Analysis settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bearing::BearingLifeSettings;
use crate::errors::ConfigError;
use crate::fatigue::{FatigueSettings, LoadCycle};
use crate::reactions::ReactionMethod;
use crate::tooth::ToothRatingFactors;

/// Safety factors and life the design has to reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    /// Required yield safety factor of shaft sections.
    pub static_safety: f64,
    /// Required fatigue safety factor of shaft sections.
    pub fatigue_safety: f64,
    /// Required tooth bending safety factor.
    pub bending_safety: f64,
    /// Required tooth pitting safety factor.
    pub pitting_safety: f64,
    /// Required modified bearing life in hours.
    pub bearing_life: f64,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            static_safety: 1.5,
            fatigue_safety: 1.5,
            bending_safety: 1.2,
            pitting_safety: 1.0,
            bearing_life: 20_000.0,
        }
    }
}

/// Every tunable the analysis consumes.
///
/// Missing fields take their default values when decoding, so a configuration
/// file only needs to name what it changes.
///
/// # Examples
/// ```
/// use gearx::AnalysisConfig;
///
/// let config = AnalysisConfig::from_json_str(r#"{ "profile_samples": 11 }"#).expect("valid");
/// assert_eq!(config.profile_samples, 11);
/// assert_eq!(config.requirements.static_safety, 1.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pass criteria.
    pub requirements: Requirements,
    /// Reaction solve strategy.
    pub reaction_method: ReactionMethod,
    /// Number of stations of a sampled shaft profile.
    pub profile_samples: usize,
    /// Alternating share of the shaft stresses.
    pub load_cycle: LoadCycle,
    /// Shaft fatigue settings.
    pub fatigue: FatigueSettings,
    /// Gear tooth rating factors.
    pub tooth: ToothRatingFactors,
    /// Bearing life settings.
    pub bearing_life: BearingLifeSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            requirements: Requirements::default(),
            reaction_method: ReactionMethod::Auto,
            profile_samples: 51,
            load_cycle: LoadCycle::default(),
            fatigue: FatigueSettings::default(),
            tooth: ToothRatingFactors::default(),
            bearing_life: BearingLifeSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Decode a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and decode a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Json`] when it is not a valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tooth::{Enclosure, PowerSource};

    #[test]
    fn partial_configuration_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(
            r#"{
                "reaction_method": "General",
                "tooth": { "power_source": "LightShock", "enclosure": "Precision" },
                "requirements": { "bearing_life": 5000.0 }
            }"#,
        )
        .expect("valid configuration");
        assert_eq!(config.reaction_method, ReactionMethod::General);
        assert_eq!(config.tooth.power_source, PowerSource::LightShock);
        assert_eq!(config.tooth.enclosure, Enclosure::Precision);
        assert_eq!(config.tooth.reliability, 0.99);
        assert_eq!(config.requirements.bearing_life, 5_000.0);
        assert_eq!(config.requirements.fatigue_safety, 1.5);
        assert_eq!(config.load_cycle, LoadCycle::default());
    }

    #[test]
    fn configuration_round_trips() {
        let config = AnalysisConfig::default();
        let text = serde_json::to_string(&config).expect("serializes");
        assert_eq!(AnalysisConfig::from_json_str(&text).expect("decodes"), config);
    }

    #[test]
    fn malformed_configuration_is_rejected() {
        let error = AnalysisConfig::from_json_str("{ \"profile_samples\": -1 }").expect_err("invalid");
        assert!(matches!(error, ConfigError::Json(_)));
        let missing = AnalysisConfig::from_path("/nonexistent/gearx.json").expect_err("missing");
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
