use super::{
    audio::AudioConfig,
    evolution::EvolutionConfig,
    fitness::FitnessConfig,
    traits::ConfigSection,
};
use crate::engines::generation::bounds::BoundsTable;
use crate::error::KickpadError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Environment overrides look like `KICKPAD_EVOLUTION__POPULATION_SIZE=50`
pub const ENV_PREFIX: &str = "KICKPAD";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickpadConfig {
    pub evolution: EvolutionConfig,
    pub audio: AudioConfig,
    pub fitness: FitnessConfig,
    pub bounds: BoundsTable,
}

impl KickpadConfig {
    pub fn validate(&self) -> Result<(), KickpadError> {
        self.evolution.validate()?;
        self.audio.validate()?;
        self.fitness.validate()?;
        self.bounds.validate()?;

        if self.evolution.elite_count * 2 > self.evolution.population_size {
            log::warn!(
                "{}: elite count {} leaves fewer offspring than elites in a population of {}",
                EvolutionConfig::section_name(),
                self.evolution.elite_count,
                self.evolution.population_size
            );
        }
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<KickpadConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(KickpadConfig::default())),
        }
    }

    /// Load a TOML file, apply environment overrides, validate, then install
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KickpadError> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: KickpadConfig = settings.try_deserialize()?;
        config.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KickpadError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> KickpadConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f`; the change is discarded if the result does not validate
    pub fn update<F>(&self, f: F) -> Result<(), KickpadError>
    where
        F: FnOnce(&mut KickpadConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
