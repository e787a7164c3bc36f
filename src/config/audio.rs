use super::traits::ConfigSection;
use crate::engines::generation::genome::GenomeContext;
use crate::error::KickpadError;
use crate::types::SoundType;
use serde::{Deserialize, Serialize};

pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [44100, 48000, 96000, 192000];
pub const SUPPORTED_BIT_DEPTHS: [u16; 2] = [16, 24];

/// Working format: every rendered and target buffer is compared at this rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
    pub sound_type: SoundType,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: 16,
            channels: 1,
            sound_type: SoundType::Kick,
        }
    }
}

impl AudioConfig {
    pub fn genome_context(&self) -> GenomeContext {
        GenomeContext {
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
            channels: self.channels,
            sound_type: self.sound_type,
        }
    }
}

impl ConfigSection for AudioConfig {
    fn section_name() -> &'static str {
        "audio"
    }

    fn validate(&self) -> Result<(), KickpadError> {
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            return Err(KickpadError::Configuration(format!(
                "Unsupported sample rate {} Hz (expected one of {:?})",
                self.sample_rate, SUPPORTED_SAMPLE_RATES
            )));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(KickpadError::Configuration(format!(
                "Unsupported bit depth {} (expected 16 or 24)",
                self.bit_depth
            )));
        }
        if self.channels == 0 {
            return Err(KickpadError::Configuration(
                "Channel count must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}
