pub mod resample;
pub mod traits;

pub use resample::LinearResampler;
pub use traits::{Resampler, Synthesizer, WaveformLoader};

use crate::error::{KickpadError, Result};
use crate::types::SampleBuffer;
use std::path::Path;

/// Load a target waveform, rejecting loader failures and empty decodes
pub fn load_target<L: WaveformLoader + ?Sized>(loader: &L, path: &Path) -> Result<SampleBuffer> {
    let buffer = loader
        .load(path)
        .map_err(|e| KickpadError::TargetLoad(format!("{}: {}", path.display(), e)))?;

    if buffer.is_empty() {
        return Err(KickpadError::Precondition(format!(
            "target waveform {} is empty",
            path.display()
        )));
    }

    log::info!(
        "Loaded target {} ({} samples at {} Hz)",
        path.display(),
        buffer.len(),
        buffer.sample_rate
    );
    Ok(buffer)
}
