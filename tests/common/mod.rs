#![allow(dead_code)]

use kickpad::engines::generation::{Genome, ProgressCallback};
use kickpad::synthesis::Synthesizer;
use kickpad::{KickpadConfig, SampleBuffer};
use std::thread;
use std::time::Duration;

pub const RATE: u32 = 44100;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders the same buffer for every genome, so nothing ever improves after generation 0
pub struct ConstantSynth;

impl Synthesizer for ConstantSynth {
    fn render(&self, genome: &Genome) -> anyhow::Result<SampleBuffer> {
        Ok(SampleBuffer::new(vec![0.25; 64], genome.sample_rate))
    }
}

/// Flat buffer at the drive level; scores against silence shrink as drive falls
pub struct DriveSynth;

impl Synthesizer for DriveSynth {
    fn render(&self, genome: &Genome) -> anyhow::Result<SampleBuffer> {
        Ok(SampleBuffer::new(vec![genome.drive; 32], genome.sample_rate))
    }
}

/// Like `DriveSynth`, but refuses to render the first waveform category
pub struct PickySynth;

impl Synthesizer for PickySynth {
    fn render(&self, genome: &Genome) -> anyhow::Result<SampleBuffer> {
        if genome.waveform == 0 {
            anyhow::bail!("waveform 0 unsupported");
        }
        DriveSynth.render(genome)
    }
}

/// `ConstantSynth` that takes a while per render
pub struct SlowSynth(pub Duration);

impl Synthesizer for SlowSynth {
    fn render(&self, genome: &Genome) -> anyhow::Result<SampleBuffer> {
        thread::sleep(self.0);
        ConstantSynth.render(genome)
    }
}

pub fn silence() -> SampleBuffer {
    SampleBuffer::new(vec![0.0; 32], RATE)
}

pub fn small_config(seed: u64) -> KickpadConfig {
    let mut config = KickpadConfig::default();
    config.evolution.population_size = 20;
    config.evolution.elite_count = 2;
    config.evolution.tournament_size = 3;
    config.evolution.mutation_rate = 0.2;
    config.evolution.seed = Some(seed);
    config
}

/// Records every engine event
#[derive(Default)]
pub struct RecordingCallback {
    pub started: Vec<usize>,
    pub improvements: Vec<(usize, f64, Genome)>,
    pub completed: Vec<(usize, f64, usize)>,
}

impl ProgressCallback for RecordingCallback {
    fn on_generation_start(&mut self, generation: usize) {
        self.started.push(generation);
    }

    fn on_improvement(&mut self, generation: usize, best_score: f64, best_genome: &Genome) {
        self.improvements.push((generation, best_score, best_genome.clone()));
    }

    fn on_generation_complete(
        &mut self,
        generation: usize,
        best_score: f64,
        _best_genome: &Genome,
        stagnation: usize,
    ) {
        self.completed.push((generation, best_score, stagnation));
    }
}
