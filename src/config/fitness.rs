use super::traits::ConfigSection;
use crate::error::KickpadError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub time_weight: f64,
    pub frequency_weight: f64,
    /// Acceptable window for attack + decay + release, in seconds
    pub min_duration: f64,
    pub max_duration: f64,
    /// Added per second outside the window
    pub duration_penalty: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            time_weight: 0.5,
            frequency_weight: 0.5,
            min_duration: 0.1,
            max_duration: 2.0,
            duration_penalty: 1000.0,
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), KickpadError> {
        let fields = [
            ("time_weight", self.time_weight),
            ("frequency_weight", self.frequency_weight),
            ("min_duration", self.min_duration),
            ("max_duration", self.max_duration),
            ("duration_penalty", self.duration_penalty),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(KickpadError::Configuration(format!(
                "Fitness setting '{}' must be finite, got {}",
                name, value
            )));
        }
        if self.time_weight < 0.0 || self.frequency_weight < 0.0 {
            return Err(KickpadError::Configuration(
                "Fitness weights must be non-negative".to_string()
            ));
        }
        if self.min_duration < 0.0 || self.min_duration > self.max_duration {
            return Err(KickpadError::Configuration(format!(
                "Duration window [{}, {}] is invalid",
                self.min_duration, self.max_duration
            )));
        }
        if self.duration_penalty < 0.0 {
            return Err(KickpadError::Configuration(
                "Duration penalty must be non-negative".to_string()
            ));
        }
        Ok(())
    }
}
