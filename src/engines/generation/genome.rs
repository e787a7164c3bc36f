//! Genome representation for the drum-voice parameter search
//!
//! A genome is one complete parameter set for the synthesizer. Nine genes are
//! continuous (see [`Gene`]) and each is bounded by the run's
//! [`BoundsTable`](super::bounds::BoundsTable). The waveform gene is a
//! category index whose range depends on the [`WaveformMode`].
//!
//! The remaining fields (sample rate, bit depth, channels, sound type) are
//! context for the synthesizer. They are copied from the run configuration
//! and never evolved.
//!
//! # Why a struct and a `Gene` key?
//!
//! Operators never touch fields by name. They walk [`Gene::ALL`] and use
//! [`Genome::get`] / [`Genome::set`], so adding a gene means adding one enum
//! variant and one bounds entry.

use crate::types::{SoundType, WaveformMode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bounds::BoundsTable;

/// Continuous genes under search
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gene {
    Attack,
    Decay,
    Sustain,
    Release,
    Drive,
    FilterCutoff,
    Sweep,
    PitchDecay,
    NoiseAmount,
}

impl Gene {
    pub const ALL: [Gene; 9] = [
        Gene::Attack,
        Gene::Decay,
        Gene::Sustain,
        Gene::Release,
        Gene::Drive,
        Gene::FilterCutoff,
        Gene::Sweep,
        Gene::PitchDecay,
        Gene::NoiseAmount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Gene::Attack => "attack",
            Gene::Decay => "decay",
            Gene::Sustain => "sustain",
            Gene::Release => "release",
            Gene::Drive => "drive",
            Gene::FilterCutoff => "filter_cutoff",
            Gene::Sweep => "sweep",
            Gene::PitchDecay => "pitch_decay",
            Gene::NoiseAmount => "noise_amount",
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
    pub drive: f64,
    pub filter_cutoff: f64,
    pub sweep: f64,
    pub pitch_decay: f64,
    pub noise_amount: f64,
    pub waveform: usize,

    // Context, not evolved
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
    pub sound_type: SoundType,
}

/// Context fields stamped onto every genome of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenomeContext {
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
    pub sound_type: SoundType,
}

impl Genome {
    pub fn get(&self, gene: Gene) -> f64 {
        match gene {
            Gene::Attack => self.attack,
            Gene::Decay => self.decay,
            Gene::Sustain => self.sustain,
            Gene::Release => self.release,
            Gene::Drive => self.drive,
            Gene::FilterCutoff => self.filter_cutoff,
            Gene::Sweep => self.sweep,
            Gene::PitchDecay => self.pitch_decay,
            Gene::NoiseAmount => self.noise_amount,
        }
    }

    pub fn set(&mut self, gene: Gene, value: f64) {
        let slot = match gene {
            Gene::Attack => &mut self.attack,
            Gene::Decay => &mut self.decay,
            Gene::Sustain => &mut self.sustain,
            Gene::Release => &mut self.release,
            Gene::Drive => &mut self.drive,
            Gene::FilterCutoff => &mut self.filter_cutoff,
            Gene::Sweep => &mut self.sweep,
            Gene::PitchDecay => &mut self.pitch_decay,
            Gene::NoiseAmount => &mut self.noise_amount,
        };
        *slot = value;
    }

    /// Sum of the envelope stages that take time. Sustain is a level.
    pub fn expected_duration(&self) -> f64 {
        self.attack + self.decay + self.release
    }

    /// Draw every continuous gene uniformly inside its bound
    pub fn random<R: Rng>(
        bounds: &BoundsTable,
        mode: WaveformMode,
        context: GenomeContext,
        rng: &mut R,
    ) -> Self {
        let mut genome = Genome {
            attack: 0.0,
            decay: 0.0,
            sustain: 0.0,
            release: 0.0,
            drive: 0.0,
            filter_cutoff: 0.0,
            sweep: 0.0,
            pitch_decay: 0.0,
            noise_amount: 0.0,
            waveform: rng.gen_range(0..mode.category_count()),
            sample_rate: context.sample_rate,
            bit_depth: context.bit_depth,
            channels: context.channels,
            sound_type: context.sound_type,
        };

        for gene in Gene::ALL {
            let range = bounds.range(gene);
            let value = if range.max > range.min {
                rng.gen_range(range.min..=range.max)
            } else {
                range.min
            };
            genome.set(gene, value);
        }

        genome
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
