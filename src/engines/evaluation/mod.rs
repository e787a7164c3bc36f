pub mod fitness;
pub mod spectrum;

pub use fitness::{FitnessBreakdown, FitnessEvaluator};
