use crate::config::FitnessConfig;
use crate::engines::evaluation::spectrum::{frequency_domain_mse, time_domain_mse};
use crate::engines::generation::genome::Genome;
use crate::synthesis::{Resampler, Synthesizer};
use crate::types::SampleBuffer;
use std::sync::Arc;

/// Components of a score, for reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessBreakdown {
    pub time_mse: f64,
    pub frequency_mse: f64,
    pub duration_penalty: f64,
    pub total: f64,
}

/// Scores genomes against one target waveform. Lower is better.
///
/// The target is resampled to the working rate once, when the evaluator is
/// built, and stays fixed for the lifetime of the run.
pub struct FitnessEvaluator {
    synthesizer: Arc<dyn Synthesizer>,
    resampler: Arc<dyn Resampler>,
    target: Arc<SampleBuffer>,
    working_rate: u32,
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(
        synthesizer: Arc<dyn Synthesizer>,
        resampler: Arc<dyn Resampler>,
        target: &SampleBuffer,
        working_rate: u32,
        config: FitnessConfig,
    ) -> Self {
        let target = if target.sample_rate != working_rate {
            log::debug!(
                "Resampling target from {} Hz to working rate {} Hz",
                target.sample_rate,
                working_rate
            );
            SampleBuffer::new(
                resampler.resample(&target.samples, target.sample_rate, working_rate),
                working_rate,
            )
        } else {
            target.clone()
        };

        Self {
            synthesizer,
            resampler,
            target: Arc::new(target),
            working_rate,
            config,
        }
    }

    /// Target at the working rate
    pub fn target(&self) -> &SampleBuffer {
        &self.target
    }

    pub fn working_rate(&self) -> u32 {
        self.working_rate
    }

    /// Score a genome. Render failures and non-finite results score `+inf`.
    pub fn evaluate(&self, genome: &Genome) -> f64 {
        match self.synthesizer.render(genome) {
            Ok(rendered) => {
                let total = self.score_rendered(genome, &rendered).total;
                if total.is_nan() {
                    f64::INFINITY
                } else {
                    total
                }
            }
            Err(e) => {
                log::debug!("Render failed, scoring as +inf: {}", e);
                f64::INFINITY
            }
        }
    }

    /// Score an already rendered buffer for `genome`
    pub fn score_rendered(&self, genome: &Genome, rendered: &SampleBuffer) -> FitnessBreakdown {
        let resampled;
        let samples: &[f64] = if rendered.sample_rate != self.working_rate {
            resampled = self
                .resampler
                .resample(&rendered.samples, rendered.sample_rate, self.working_rate);
            &resampled
        } else {
            &rendered.samples
        };

        let time_mse = time_domain_mse(samples, &self.target.samples);
        let frequency_mse = frequency_domain_mse(samples, &self.target.samples);
        let duration_penalty = duration_penalty(genome, &self.config);
        let total = self.config.time_weight * time_mse
            + self.config.frequency_weight * frequency_mse
            + duration_penalty;

        FitnessBreakdown {
            time_mse,
            frequency_mse,
            duration_penalty,
            total,
        }
    }
}

/// Penalty for an envelope whose length falls outside the configured window
pub fn duration_penalty(genome: &Genome, config: &FitnessConfig) -> f64 {
    let duration = genome.expected_duration();
    if duration < config.min_duration {
        (config.min_duration - duration) * config.duration_penalty
    } else if duration > config.max_duration {
        (duration - config.max_duration) * config.duration_penalty
    } else {
        0.0
    }
}
