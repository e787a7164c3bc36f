use crate::engines::generation::bounds::BoundsTable;
use crate::engines::generation::genome::{Gene, Genome, GenomeContext};
use crate::types::WaveformMode;
use rand::Rng;

/// Multiplicative mutation factor range, `[0.8, 1.2]`
const MUTATION_SCALE_MIN: f64 = 0.8;
const MUTATION_SCALE_SPAN: f64 = 0.4;

/// Tournament selection: pick the lowest-scored of K random candidates (drawn with replacement).
/// Ties keep the first-found candidate.
pub fn tournament_selection<'a, R: Rng>(
    population: &'a [(Genome, f64)],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Genome {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_score = population[best_idx].1;

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].1 < best_score {
            best_idx = idx;
            best_score = population[idx].1;
        }
    }

    &population[best_idx].0
}

/// Uniform crossover: each gene (the nine continuous ones and the waveform)
/// is swapped between the two children with probability 0.5
pub fn crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    for gene in Gene::ALL {
        if rng.gen_bool(0.5) {
            child1.set(gene, parent2.get(gene));
            child2.set(gene, parent1.get(gene));
        }
    }
    if rng.gen_bool(0.5) {
        child1.waveform = parent2.waveform;
        child2.waveform = parent1.waveform;
    }

    (child1, child2)
}

/// Mutation: scale each continuous gene by a factor in [0.8, 1.2] with
/// probability `mutation_rate`, then clamp. The waveform gene is redrawn from
/// the mode's categories with the same probability.
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    mutation_rate: f64,
    bounds: &BoundsTable,
    mode: WaveformMode,
    rng: &mut R,
) {
    for gene in Gene::ALL {
        if rng.gen::<f64>() < mutation_rate {
            let factor = MUTATION_SCALE_MIN + rng.gen::<f64>() * MUTATION_SCALE_SPAN;
            genome.set(gene, genome.get(gene) * factor);
        }
    }
    if rng.gen::<f64>() < mutation_rate {
        genome.waveform = rng.gen_range(0..mode.category_count());
    }

    // Crossover can carry in values from a parent built under another table
    bounds.clamp_all(genome);
}

/// Generate a random population
pub fn random_population<R: Rng>(
    size: usize,
    bounds: &BoundsTable,
    mode: WaveformMode,
    context: GenomeContext,
    rng: &mut R,
) -> Vec<Genome> {
    (0..size)
        .map(|_| Genome::random(bounds, mode, context, rng))
        .collect()
}
