//! Evolutionary search for drum-synthesizer parameters that reproduce a reference sample.
//!
//! The search itself lives in [`engines`]; [`services::RunController`] runs it
//! on a background thread and publishes status snapshots. Rendering, resampling
//! and file decoding are supplied by the caller through the traits in
//! [`synthesis`].

pub mod config;
pub mod engines;
pub mod error;
pub mod services;
pub mod synthesis;
pub mod types;

pub use self::config::KickpadConfig;
pub use engines::evaluation::FitnessEvaluator;
pub use engines::generation::{
    CancellationToken, EvolutionEngine, Gene, Genome, RunReport, RunState, RunStatus,
};
pub use error::{KickpadError, Result};
pub use services::RunController;
pub use types::{SampleBuffer, SoundType, WaveformMode};
