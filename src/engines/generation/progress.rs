use super::evolution_engine::ProgressCallback;
use super::genome::Genome;
use std::sync::mpsc::Sender;

/// Reports progress through the `log` facade
pub struct LogProgressCallback {
    /// Emit a summary every `interval` generations (improvements are always logged)
    pub interval: usize,
}

impl Default for LogProgressCallback {
    fn default() -> Self {
        Self { interval: 10 }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting...", generation);
    }

    fn on_improvement(&mut self, generation: usize, best_score: f64, best_genome: &Genome) {
        log::debug!(
            "Generation {}: improved to {:.6} (waveform {}, cutoff {:.1} Hz)",
            generation,
            best_score,
            best_genome.waveform,
            best_genome.filter_cutoff
        );
    }

    fn on_generation_complete(
        &mut self,
        generation: usize,
        best_score: f64,
        _best_genome: &Genome,
        stagnation: usize,
    ) {
        if self.interval > 0 && generation % self.interval == 0 {
            log::info!(
                "Generation {}: best fitness = {:.6}, stagnation {}",
                generation,
                best_score,
                stagnation
            );
        }
    }
}

// For pushing progress to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    Improvement { generation: usize, best_score: f64, best_genome: Genome },
    GenerationComplete { generation: usize, best_score: f64, stagnation: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_improvement(&mut self, generation: usize, best_score: f64, best_genome: &Genome) {
        let _ = self.sender.send(ProgressMessage::Improvement {
            generation,
            best_score,
            best_genome: best_genome.clone(),
        });
    }

    fn on_generation_complete(
        &mut self,
        generation: usize,
        best_score: f64,
        _best_genome: &Genome,
        stagnation: usize,
    ) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_score,
            stagnation,
        });
    }
}
