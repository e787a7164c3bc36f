use crate::config::KickpadConfig;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    evolution_engine::{EvolutionEngine, ProgressCallback},
    genome::Genome,
    progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage},
    state::{CancellationToken, RunReport, RunState, RunStatus},
};
use crate::error::{KickpadError, Result};
use crate::synthesis::{Resampler, Synthesizer};
use crate::types::SampleBuffer;
use arc_swap::ArcSwap;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Publishes a fresh `RunStatus` snapshot on every engine event
struct SnapshotPublisher {
    run_id: u64,
    status: Arc<ArcSwap<RunStatus>>,
    log: LogProgressCallback,
    channel: Option<ChannelProgressCallback>,
}

impl SnapshotPublisher {
    fn publish(&self, generation: usize, best_score: f64, best_genome: &Genome, stagnation: usize) {
        self.status.store(Arc::new(RunStatus {
            run_id: self.run_id,
            state: RunState::Running,
            generation,
            best_score,
            best_genome: Some(best_genome.clone()),
            stagnation,
            message: format!("Generation {}: best fitness = {:.6}", generation, best_score),
            updated_at: Utc::now(),
        }));
    }
}

impl ProgressCallback for SnapshotPublisher {
    fn on_generation_start(&mut self, generation: usize) {
        self.log.on_generation_start(generation);
        if let Some(channel) = &mut self.channel {
            channel.on_generation_start(generation);
        }
    }

    fn on_improvement(&mut self, generation: usize, best_score: f64, best_genome: &Genome) {
        self.publish(generation, best_score, best_genome, 0);
        self.log.on_improvement(generation, best_score, best_genome);
        if let Some(channel) = &mut self.channel {
            channel.on_improvement(generation, best_score, best_genome);
        }
    }

    fn on_generation_complete(
        &mut self,
        generation: usize,
        best_score: f64,
        best_genome: &Genome,
        stagnation: usize,
    ) {
        self.publish(generation, best_score, best_genome, stagnation);
        self.log.on_generation_complete(generation, best_score, best_genome, stagnation);
        if let Some(channel) = &mut self.channel {
            channel.on_generation_complete(generation, best_score, best_genome, stagnation);
        }
    }
}

struct ActiveRun {
    id: u64,
    handle: JoinHandle<RunReport>,
}

/// Cancellation handle of the most recently started run
struct CancelSlot {
    run_id: u64,
    token: CancellationToken,
}

/// Starts, cancels and observes background searches. At most one search runs at a time.
pub struct RunController {
    synthesizer: Arc<dyn Synthesizer>,
    resampler: Arc<dyn Resampler>,
    status: Arc<ArcSwap<RunStatus>>,
    active: Mutex<Option<ActiveRun>>,
    cancel_slot: Mutex<Option<CancelSlot>>,
    subscriber: Mutex<Option<ChannelProgressCallback>>,
    next_run_id: AtomicU64,
}

impl RunController {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, resampler: Arc<dyn Resampler>) -> Self {
        Self {
            synthesizer,
            resampler,
            status: Arc::new(ArcSwap::from_pointee(RunStatus::idle())),
            active: Mutex::new(None),
            cancel_slot: Mutex::new(None),
            subscriber: Mutex::new(None),
            next_run_id: AtomicU64::new(1),
        }
    }

    /// Receive pushed progress for the next run started
    pub fn subscribe(&self) -> Receiver<ProgressMessage> {
        let (tx, rx) = channel();
        *lock(&self.subscriber) = Some(ChannelProgressCallback::new(tx));
        rx
    }

    /// Start a search in a background thread.
    ///
    /// Rejected while another search is running, and when the target or the
    /// configuration is unusable. A rejected start changes nothing.
    pub fn start(&self, target: SampleBuffer, config: KickpadConfig) -> Result<()> {
        let mut active = lock(&self.active);

        // A panicked worker never publishes a terminal state, so a finished handle frees the slot
        let finished = active.as_ref().map_or(false, |run| run.handle.is_finished());
        if self.is_running() && !finished {
            return Err(KickpadError::RunActive);
        }
        if target.is_empty() {
            return Err(KickpadError::Precondition(
                "no target waveform loaded".to_string(),
            ));
        }
        if target.sample_rate == 0 {
            return Err(KickpadError::Precondition(
                "target waveform has no sample rate".to_string(),
            ));
        }
        config.validate()?;

        // A finished run nobody collected is dropped here
        if let Some(previous) = active.take() {
            if previous.handle.join().is_err() {
                log::warn!("Previous search thread panicked");
            }
        }

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let publisher = SnapshotPublisher {
            run_id,
            status: Arc::clone(&self.status),
            log: LogProgressCallback::default(),
            channel: lock(&self.subscriber).take(),
        };
        let synthesizer = Arc::clone(&self.synthesizer);
        let resampler = Arc::clone(&self.resampler);
        let status = Arc::clone(&self.status);
        let thread_cancel = cancel.clone();
        *lock(&self.cancel_slot) = Some(CancelSlot {
            run_id,
            token: cancel,
        });

        log::info!(
            "Starting search against {} samples at {} Hz",
            target.len(),
            target.sample_rate
        );
        self.status.store(Arc::new(RunStatus {
            run_id,
            state: RunState::Running,
            message: "Training started...".to_string(),
            ..RunStatus::idle()
        }));

        let spawned = thread::Builder::new()
            .name("kickpad-search".to_owned())
            .spawn(move || {
                Self::run_search(
                    target,
                    config,
                    synthesizer,
                    resampler,
                    status,
                    publisher,
                    thread_cancel,
                    run_id,
                )
            });

        match spawned {
            Ok(handle) => {
                *active = Some(ActiveRun {
                    id: run_id,
                    handle,
                });
                Ok(())
            }
            Err(e) => {
                self.release(run_id);
                Err(KickpadError::Io(e))
            }
        }
    }

    /// Ask the active search to stop at its next generation boundary. No-op when idle.
    pub fn cancel(&self) {
        let status = self.status.load();
        if status.state != RunState::Running {
            return;
        }
        if let Some(slot) = lock(&self.cancel_slot).as_ref() {
            if slot.run_id == status.run_id {
                log::info!("Cancellation requested for run {}", slot.run_id);
                slot.token.cancel();
            }
        }
    }

    /// Latest complete snapshot; never a partially updated one
    pub fn current_status(&self) -> Arc<RunStatus> {
        self.status.load_full()
    }

    pub fn is_running(&self) -> bool {
        self.status.load().state == RunState::Running
    }

    /// Collect a finished search and reset to `Idle`. `None` while running or idle.
    pub fn try_take_report(&self) -> Option<Result<RunReport>> {
        let mut active = lock(&self.active);
        let finished = active.as_ref().map_or(false, |run| run.handle.is_finished());
        if !finished {
            return None;
        }

        let run = active.take()?;
        Some(self.consume(run))
    }

    /// Block until the active search ends, then collect it. `None` when idle.
    pub fn wait(&self) -> Option<Result<RunReport>> {
        let run = lock(&self.active).take()?;
        Some(self.consume(run))
    }

    fn consume(&self, run: ActiveRun) -> Result<RunReport> {
        let result = run
            .handle
            .join()
            .map_err(|_| KickpadError::Worker("search thread panicked".to_string()));
        self.release(run.id);
        result
    }

    /// Drop the cancel token and reset to `Idle`, unless a newer run has taken over
    fn release(&self, run_id: u64) {
        {
            let mut slot = lock(&self.cancel_slot);
            if slot.as_ref().map_or(false, |s| s.run_id == run_id) {
                *slot = None;
            }
        }

        let current = self.status.load_full();
        if current.run_id == run_id {
            // Fails harmlessly when a newer run published in between
            self.status.compare_and_swap(&current, Arc::new(RunStatus::idle()));
        }
    }

    /// Run the search (called in background thread)
    fn run_search(
        target: SampleBuffer,
        config: KickpadConfig,
        synthesizer: Arc<dyn Synthesizer>,
        resampler: Arc<dyn Resampler>,
        status: Arc<ArcSwap<RunStatus>>,
        mut publisher: SnapshotPublisher,
        cancel: CancellationToken,
        run_id: u64,
    ) -> RunReport {
        let evaluator = FitnessEvaluator::new(
            synthesizer,
            resampler,
            &target,
            config.audio.sample_rate,
            config.fitness.clone(),
        );
        let mut engine = EvolutionEngine::from_config(&config, evaluator);

        let report = engine.run(&cancel, &mut publisher);

        status.store(Arc::new(RunStatus {
            run_id,
            state: report.state,
            generation: report.generation,
            best_score: report.best_score,
            best_genome: Some(report.best_genome.clone()),
            stagnation: status.load().stagnation,
            message: report.reason.clone(),
            updated_at: report.finished_at,
        }));

        report
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
