use super::genome::{Gene, Genome};
use crate::error::KickpadError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Closed interval a continuous gene must stay inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneRange {
    pub min: f64,
    pub max: f64,
}

impl GeneRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-gene bounds used by initialization, mutation and clamping.
///
/// Deserialized tables are layered over the defaults, so a config file only
/// lists the genes it narrows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundsTable {
    ranges: BTreeMap<Gene, GeneRange>,
}

impl Default for BoundsTable {
    fn default() -> Self {
        let ranges = [
            (Gene::Attack, GeneRange::new(0.05, 0.5)),
            (Gene::Decay, GeneRange::new(0.05, 0.5)),
            (Gene::Sustain, GeneRange::new(0.1, 1.0)),
            (Gene::Release, GeneRange::new(0.05, 1.0)),
            (Gene::Drive, GeneRange::new(0.0, 1.0)),
            (Gene::FilterCutoff, GeneRange::new(500.0, 10000.0)),
            (Gene::Sweep, GeneRange::new(0.1, 2.0)),
            (Gene::PitchDecay, GeneRange::new(0.1, 1.5)),
            (Gene::NoiseAmount, GeneRange::new(0.0, 1.0)),
        ]
        .into_iter()
        .collect();

        Self { ranges }
    }
}

impl<'de> Deserialize<'de> for BoundsTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<Gene, GeneRange>::deserialize(deserializer)?;
        let mut table = Self::default();
        table.ranges.extend(overrides);
        Ok(table)
    }
}

impl BoundsTable {
    /// Bound for `gene`. A table that passed `validate` has every gene;
    /// otherwise a missing gene is left unconstrained.
    pub fn range(&self, gene: Gene) -> GeneRange {
        self.ranges
            .get(&gene)
            .copied()
            .unwrap_or(GeneRange::new(f64::NEG_INFINITY, f64::INFINITY))
    }

    pub fn set(&mut self, gene: Gene, range: GeneRange) {
        self.ranges.insert(gene, range);
    }

    /// Clamp one gene in place
    pub fn clamp_gene(&self, genome: &mut Genome, gene: Gene) {
        let value = self.range(gene).clamp(genome.get(gene));
        genome.set(gene, value);
    }

    /// Clamp every continuous gene of `genome` into its bound
    pub fn clamp_all(&self, genome: &mut Genome) {
        for gene in Gene::ALL {
            self.clamp_gene(genome, gene);
        }
    }

    pub fn is_within(&self, genome: &Genome) -> bool {
        Gene::ALL
            .iter()
            .all(|&gene| self.range(gene).contains(genome.get(gene)))
    }

    pub fn validate(&self) -> Result<(), KickpadError> {
        for gene in Gene::ALL {
            let range = self.ranges.get(&gene).ok_or_else(|| {
                KickpadError::Configuration(format!("Missing bounds for gene '{}'", gene))
            })?;
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(KickpadError::Configuration(format!(
                    "Bounds for gene '{}' must be finite",
                    gene
                )));
            }
            if range.min > range.max {
                return Err(KickpadError::Configuration(format!(
                    "Bounds for gene '{}' are inverted: min {} > max {}",
                    gene, range.min, range.max
                )));
            }
        }
        Ok(())
    }
}
