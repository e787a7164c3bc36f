mod common;

use common::*;
use kickpad::engines::generation::{
    CancellationToken, EvolutionEngine, Genome, ProgressCallback, RunState,
};
use kickpad::synthesis::{LinearResampler, Synthesizer};
use kickpad::{FitnessEvaluator, KickpadConfig, SampleBuffer, WaveformMode};
use std::sync::Arc;

fn engine(
    synth: Arc<dyn Synthesizer>,
    config: &KickpadConfig,
    target: &SampleBuffer,
) -> EvolutionEngine {
    let evaluator = FitnessEvaluator::new(
        synth,
        Arc::new(LinearResampler),
        target,
        config.audio.sample_rate,
        config.fitness.clone(),
    );
    EvolutionEngine::from_config(config, evaluator)
}

/// Cancels the run halfway through evaluating one generation
struct CancelDuring {
    token: CancellationToken,
    at_generation: usize,
    current: usize,
    inner: RecordingCallback,
}

impl ProgressCallback for CancelDuring {
    fn on_generation_start(&mut self, generation: usize) {
        self.current = generation;
        self.inner.on_generation_start(generation);
    }

    fn on_genome_evaluated(&mut self, evaluated: usize, total: usize) {
        if self.current == self.at_generation && evaluated == total / 2 {
            self.token.cancel();
        }
    }

    fn on_improvement(&mut self, generation: usize, best_score: f64, best_genome: &Genome) {
        self.inner.on_improvement(generation, best_score, best_genome);
    }

    fn on_generation_complete(
        &mut self,
        generation: usize,
        best_score: f64,
        best_genome: &Genome,
        stagnation: usize,
    ) {
        self.inner.on_generation_complete(generation, best_score, best_genome, stagnation);
    }
}

#[test]
fn test_stagnation_stops_at_limit() {
    init_logging();

    let mut config = small_config(1);
    config.evolution.max_stagnation = 5;
    config.evolution.max_generations = 100;

    let mut engine = engine(Arc::new(ConstantSynth), &config, &silence());
    let mut callback = RecordingCallback::default();
    let report = engine.run(&CancellationToken::new(), &mut callback);

    assert_eq!(report.state, RunState::Stagnant);
    assert_eq!(report.generation, 5);
    assert_eq!(callback.started, vec![0, 1, 2, 3, 4, 5]);

    // Only generation 0 improved, and its best is what gets reported
    assert_eq!(callback.improvements.len(), 1);
    let (generation, score, genome) = &callback.improvements[0];
    assert_eq!(*generation, 0);
    assert_eq!(report.best_score, *score);
    assert_eq!(&report.best_genome, genome);
    assert!(report.reason.contains("No improvement in 5 generations"));
}

#[test]
fn test_cancellation_ends_run_in_same_generation() {
    init_logging();

    let mut config = small_config(2);
    config.evolution.convergence_threshold = 0.0;
    config.evolution.max_stagnation = 1000;

    let token = CancellationToken::new();
    let mut callback = CancelDuring {
        token: token.clone(),
        at_generation: 2,
        current: 0,
        inner: RecordingCallback::default(),
    };

    let mut engine = engine(Arc::new(DriveSynth), &config, &silence());
    let report = engine.run(&token, &mut callback);

    assert_eq!(report.state, RunState::Cancelled);
    assert_eq!(report.generation, 2);
    assert_eq!(callback.inner.started, vec![0, 1, 2]);

    // Generation 2 still completed and its best is preserved
    let (last_generation, last_best, _) = *callback.inner.completed.last().unwrap();
    assert_eq!(last_generation, 2);
    assert_eq!(report.best_score, last_best);
}

#[test]
fn test_cancel_before_start_reports_initial_genome() {
    let config = small_config(3);
    let token = CancellationToken::new();
    token.cancel();

    let mut engine = engine(Arc::new(DriveSynth), &config, &silence());
    let mut callback = RecordingCallback::default();
    let report = engine.run(&token, &mut callback);

    assert_eq!(report.state, RunState::Cancelled);
    assert!(callback.started.is_empty());
    assert!(callback.completed.is_empty());
    assert_eq!(report.generation, 0);
    assert!(report.best_score.is_infinite());
}

#[test]
fn test_best_score_never_gets_worse() {
    init_logging();

    let mut config = small_config(4);
    config.evolution.max_generations = 40;
    config.evolution.max_stagnation = 1000;
    config.evolution.convergence_threshold = 0.0;

    let mut engine = engine(Arc::new(DriveSynth), &config, &silence());
    let mut callback = RecordingCallback::default();
    let report = engine.run(&CancellationToken::new(), &mut callback);

    assert_eq!(report.state, RunState::Exhausted);
    assert_eq!(report.generation, 39);
    assert_eq!(callback.completed.len(), 40);

    for window in callback.completed.windows(2) {
        assert!(
            window[1].1 <= window[0].1,
            "best score rose from {} to {} at generation {}",
            window[0].1,
            window[1].1,
            window[1].0
        );
    }
    assert_eq!(report.best_score, callback.completed.last().unwrap().1);
    assert!(report.reason.contains("maximum of 40 generations"));
}

#[test]
fn test_converges_below_threshold() {
    let mut config = small_config(5);
    config.evolution.population_size = 50;
    config.evolution.convergence_threshold = 1.0;

    let mut engine = engine(Arc::new(DriveSynth), &config, &silence());
    let mut callback = RecordingCallback::default();
    let report = engine.run(&CancellationToken::new(), &mut callback);

    assert_eq!(report.state, RunState::Converged);
    assert!(report.best_score < 1.0);
    assert!(report.reason.contains("Global optimum found"));
    assert_eq!(callback.improvements.last().unwrap().0, report.generation);
}

#[test]
fn test_render_failures_do_not_abort_generation() {
    let mut config = small_config(6);
    config.evolution.waveform_mode = WaveformMode::Basic;
    config.evolution.max_generations = 5;
    config.evolution.convergence_threshold = 0.0;

    let mut engine = engine(Arc::new(PickySynth), &config, &silence());
    let mut callback = RecordingCallback::default();
    let report = engine.run(&CancellationToken::new(), &mut callback);

    assert_eq!(report.state, RunState::Exhausted);
    assert_eq!(callback.started.len(), 5);
    assert!(report.best_score.is_finite());
    assert_eq!(report.best_genome.waveform, 1);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut config = small_config(7);
    config.evolution.max_generations = 10;
    config.evolution.convergence_threshold = 0.0;

    let first = engine(Arc::new(DriveSynth), &config, &silence())
        .run(&CancellationToken::new(), &mut RecordingCallback::default());
    let second = engine(Arc::new(DriveSynth), &config, &silence())
        .run(&CancellationToken::new(), &mut RecordingCallback::default());

    assert_eq!(first.best_genome, second.best_genome);
    assert_eq!(first.best_score, second.best_score);
}

#[test]
fn test_zero_distance_genome_scores_zero() {
    let config = small_config(8);
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(8);
    let genome = Genome::random(
        &config.bounds,
        WaveformMode::Extended,
        config.audio.genome_context(),
        &mut rng,
    );
    let target = DriveSynth.render(&genome).unwrap();

    let evaluator = FitnessEvaluator::new(
        Arc::new(DriveSynth),
        Arc::new(LinearResampler),
        &target,
        config.audio.sample_rate,
        config.fitness.clone(),
    );

    assert_eq!(evaluator.evaluate(&genome), 0.0);
}

#[test]
fn test_report_serializes_to_json() {
    let mut config = small_config(9);
    config.evolution.max_generations = 2;

    let report = engine(Arc::new(DriveSynth), &config, &silence())
        .run(&CancellationToken::new(), &mut RecordingCallback::default());
    let json = report.to_json().unwrap();

    assert!(json.contains("\"best_genome\""));
    assert!(json.contains("\"filter_cutoff\""));
}
