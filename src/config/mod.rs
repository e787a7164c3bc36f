pub mod traits;
pub mod evolution;
pub mod audio;
pub mod fitness;
pub mod manager;

pub use manager::{ConfigManager, KickpadConfig};
pub use evolution::EvolutionConfig;
pub use audio::AudioConfig;
pub use fitness::FitnessConfig;
pub use traits::ConfigSection;
