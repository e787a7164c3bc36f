use super::traits::ConfigSection;
use crate::error::KickpadError;
use crate::types::WaveformMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub tournament_size: usize,
    pub elite_count: usize,
    pub mutation_rate: f64,
    pub max_generations: usize,
    pub max_stagnation: usize,
    pub convergence_threshold: f64,
    pub waveform_mode: WaveformMode,
    /// Score genomes of a generation on the rayon pool
    pub parallel_evaluation: bool,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            tournament_size: 5,
            elite_count: 10,
            mutation_rate: 0.05,
            max_generations: 1000,
            max_stagnation: 10,
            convergence_threshold: 1e-3,
            waveform_mode: WaveformMode::Extended,
            parallel_evaluation: false,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), KickpadError> {
        if self.population_size < 2 {
            return Err(KickpadError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.tournament_size == 0 {
            return Err(KickpadError::Configuration(
                "Tournament size must be at least 1".to_string()
            ));
        }
        if self.elite_count > self.population_size {
            return Err(KickpadError::Configuration(format!(
                "Elite count {} exceeds population size {}",
                self.elite_count, self.population_size
            )));
        }
        if self.mutation_rate < 0.0 || self.mutation_rate > 1.0 {
            return Err(KickpadError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if self.max_generations == 0 {
            return Err(KickpadError::Configuration(
                "Max generations must be at least 1".to_string()
            ));
        }
        if self.max_stagnation == 0 {
            return Err(KickpadError::Configuration(
                "Max stagnation must be at least 1".to_string()
            ));
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(KickpadError::Configuration(
                "Convergence threshold must be non-negative".to_string()
            ));
        }
        Ok(())
    }
}
