pub mod bounds;
pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;
pub mod state;

pub use bounds::{BoundsTable, GeneRange};
pub use evolution_engine::{EvolutionEngine, ProgressCallback};
pub use genome::{Gene, Genome, GenomeContext};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage};
pub use state::{CancellationToken, RunReport, RunState, RunStatus};
