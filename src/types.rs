use serde::{Deserialize, Serialize};
use std::fmt;

/// Mono sample buffer in [-1, 1] together with the rate it was recorded or rendered at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Drum voice category carried alongside a genome (never evolved)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundType {
    Kick,
    Clap,
    Snare,
    ClosedHH,
    OpenHH,
    Rimshot,
    Tom,
    Percussion,
    Ride,
    Crash,
    Bass,
    Xylophone,
    Lead,
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoundType::Kick => "kick",
            SoundType::Clap => "clap",
            SoundType::Snare => "snare",
            SoundType::ClosedHH => "closed hi-hat",
            SoundType::OpenHH => "open hi-hat",
            SoundType::Rimshot => "rimshot",
            SoundType::Tom => "tom",
            SoundType::Percussion => "percussion",
            SoundType::Ride => "ride",
            SoundType::Crash => "crash",
            SoundType::Bass => "bass",
            SoundType::Xylophone => "xylophone",
            SoundType::Lead => "lead",
        };
        f.write_str(name)
    }
}

/// Which oscillator waveforms the search may pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveformMode {
    /// Sine and triangle only
    Basic,
    /// Sine, triangle, sawtooth, square and the three noise colours
    Extended,
}

impl WaveformMode {
    /// Number of waveform categories; valid indices are `0..category_count()`
    pub fn category_count(self) -> usize {
        match self {
            WaveformMode::Basic => 2,
            WaveformMode::Extended => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_mode_categories() {
        assert_eq!(WaveformMode::Basic.category_count(), 2);
        assert_eq!(WaveformMode::Extended.category_count(), 7);
    }

    #[test]
    fn test_sample_buffer_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 22050], 44100);
        assert!((buffer.duration() - 0.5).abs() < 1e-12);
        assert_eq!(SampleBuffer::new(vec![0.0; 4], 0).duration(), 0.0);
    }
}
