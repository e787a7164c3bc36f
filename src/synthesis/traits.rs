use anyhow::Result;
use std::path::Path;

use crate::engines::generation::genome::Genome;
use crate::types::SampleBuffer;

/// Renders a genome into audio. Implementations must be deterministic:
/// the same genome always yields the same buffer.
pub trait Synthesizer: Send + Sync {
    fn render(&self, genome: &Genome) -> Result<SampleBuffer>;
}

/// Sample-rate conversion
pub trait Resampler: Send + Sync {
    fn resample(&self, samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64>;
}

/// Decodes a stored audio file into a normalized buffer at its native rate
pub trait WaveformLoader {
    fn load(&self, path: &Path) -> Result<SampleBuffer>;
}

impl<S: Synthesizer + ?Sized> Synthesizer for std::sync::Arc<S> {
    fn render(&self, genome: &Genome) -> Result<SampleBuffer> {
        (**self).render(genome)
    }
}

impl<R: Resampler + ?Sized> Resampler for std::sync::Arc<R> {
    fn resample(&self, samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64> {
        (**self).resample(samples, from_rate, to_rate)
    }
}
