use crate::config::{EvolutionConfig, KickpadConfig};
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    bounds::BoundsTable,
    genome::{Genome, GenomeContext},
    operators::{crossover, mutate, random_population, tournament_selection},
    state::{CancellationToken, RunReport, RunState},
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

pub struct EvolutionEngine {
    config: EvolutionConfig,
    bounds: BoundsTable,
    context: GenomeContext,
    evaluator: FitnessEvaluator,
    rng: StdRng,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_genome_evaluated(&mut self, _evaluated: usize, _total: usize) {}

    /// Called as soon as a generation beats the global best
    fn on_improvement(&mut self, generation: usize, best_score: f64, best_genome: &Genome);

    fn on_generation_complete(
        &mut self,
        generation: usize,
        best_score: f64,
        best_genome: &Genome,
        stagnation: usize,
    );
}

/// Best-so-far bookkeeping for one run
struct Progress {
    best_genome: Genome,
    best_score: f64,
    stagnation: usize,
    started_at: DateTime<Utc>,
}

impl EvolutionEngine {
    pub fn new(
        config: EvolutionConfig,
        bounds: BoundsTable,
        context: GenomeContext,
        evaluator: FitnessEvaluator,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            bounds,
            context,
            evaluator,
            rng,
        }
    }

    pub fn from_config(config: &KickpadConfig, evaluator: FitnessEvaluator) -> Self {
        Self::new(
            config.evolution.clone(),
            config.bounds.clone(),
            config.audio.genome_context(),
            evaluator,
        )
    }

    /// Run generations until convergence, stagnation, cancellation or the generation cap
    pub fn run<C: ProgressCallback>(
        &mut self,
        cancel: &CancellationToken,
        callback: &mut C,
    ) -> RunReport {
        let mut population = self.initialize_population();
        let mut progress = Progress {
            best_genome: population[0].clone(),
            best_score: f64::INFINITY,
            stagnation: 0,
            started_at: Utc::now(),
        };
        let mut last_completed = 0;

        log::info!(
            "Starting search: population {}, elites {}, tournament {}, max {} generations",
            self.config.population_size,
            self.config.elite_count,
            self.config.tournament_size,
            self.config.max_generations
        );

        for generation in 0..self.config.max_generations {
            if cancel.is_cancelled() {
                return self.finish(
                    RunState::Cancelled,
                    format!("Cancelled at generation {}", last_completed),
                    last_completed,
                    progress,
                );
            }

            callback.on_generation_start(generation);

            let evaluated = self.evaluate_population(population, callback);

            // First-found minimum
            let mut generation_best: Option<(usize, f64)> = None;
            for (i, (_, score)) in evaluated.iter().enumerate() {
                if generation_best.map_or(true, |(_, best)| *score < best) {
                    generation_best = Some((i, *score));
                }
            }

            let mut terminal = None;
            match generation_best {
                Some((idx, score)) if score < progress.best_score => {
                    progress.best_score = score;
                    progress.best_genome = evaluated[idx].0.clone();
                    progress.stagnation = 0;

                    log::info!("Generation {}: new best score {:.6}", generation, score);
                    callback.on_improvement(generation, score, &progress.best_genome);

                    if progress.best_score < self.config.convergence_threshold {
                        terminal = Some((
                            RunState::Converged,
                            format!("Global optimum found at generation {}", generation),
                        ));
                    }
                }
                _ => {
                    progress.stagnation += 1;
                    if progress.stagnation >= self.config.max_stagnation {
                        terminal = Some((
                            RunState::Stagnant,
                            format!(
                                "No improvement in {} generations",
                                self.config.max_stagnation
                            ),
                        ));
                    }
                }
            }

            last_completed = generation;
            log::debug!(
                "Generation {} complete: best {:.6}, stagnation {}",
                generation,
                progress.best_score,
                progress.stagnation
            );
            callback.on_generation_complete(
                generation,
                progress.best_score,
                &progress.best_genome,
                progress.stagnation,
            );

            if let Some((state, reason)) = terminal {
                return self.finish(state, reason, generation, progress);
            }
            if cancel.is_cancelled() {
                return self.finish(
                    RunState::Cancelled,
                    format!("Cancelled at generation {}", generation),
                    generation,
                    progress,
                );
            }
            if generation + 1 == self.config.max_generations {
                break;
            }

            population = self.create_next_generation(&evaluated);
        }

        self.finish(
            RunState::Exhausted,
            format!(
                "Reached maximum of {} generations",
                self.config.max_generations
            ),
            last_completed,
            progress,
        )
    }

    fn finish(
        &self,
        state: RunState,
        reason: String,
        generation: usize,
        progress: Progress,
    ) -> RunReport {
        log::info!(
            "Search {} at generation {}: {} (best score {:.6})",
            state,
            generation,
            reason,
            progress.best_score
        );

        RunReport {
            state,
            reason,
            generation,
            best_score: progress.best_score,
            best_genome: progress.best_genome,
            started_at: progress.started_at,
            finished_at: Utc::now(),
        }
    }

    fn initialize_population(&mut self) -> Vec<Genome> {
        random_population(
            self.config.population_size,
            &self.bounds,
            self.config.waveform_mode,
            self.context,
            &mut self.rng,
        )
    }

    fn evaluate_population<C: ProgressCallback>(
        &self,
        population: Vec<Genome>,
        callback: &mut C,
    ) -> Vec<(Genome, f64)> {
        let total = population.len();

        if self.config.parallel_evaluation {
            let scores: Vec<f64> = population
                .par_iter()
                .map(|genome| self.evaluator.evaluate(genome))
                .collect();
            callback.on_genome_evaluated(total, total);
            return population.into_iter().zip(scores).collect();
        }

        population
            .into_iter()
            .enumerate()
            .map(|(i, genome)| {
                let score = self.evaluator.evaluate(&genome);
                callback.on_genome_evaluated(i + 1, total);
                (genome, score)
            })
            .collect()
    }

    fn create_next_generation(&mut self, evaluated: &[(Genome, f64)]) -> Vec<Genome> {
        let population_size = self.config.population_size;
        let mut next_generation = Vec::with_capacity(population_size + 1);

        // Elitism: copy top performers unchanged
        let mut ranked: Vec<&(Genome, f64)> = evaluated.iter().collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        let elite_count = self.config.elite_count.min(population_size);
        for (genome, _) in ranked.into_iter().take(elite_count) {
            next_generation.push(genome.clone());
        }

        // Generate offspring
        let tournament_size = self.config.tournament_size;
        let mutation_rate = self.config.mutation_rate;
        let mode = self.config.waveform_mode;
        while next_generation.len() < population_size {
            let parent1 = tournament_selection(evaluated, tournament_size, &mut self.rng);
            let parent2 = tournament_selection(evaluated, tournament_size, &mut self.rng);

            let (mut child1, mut child2) = crossover(parent1, parent2, &mut self.rng);

            mutate(&mut child1, mutation_rate, &self.bounds, mode, &mut self.rng);
            mutate(&mut child2, mutation_rate, &self.bounds, mode, &mut self.rng);

            next_generation.push(child1);
            next_generation.push(child2);
        }

        next_generation.truncate(population_size);
        next_generation
    }
}
