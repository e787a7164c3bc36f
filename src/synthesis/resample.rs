use super::traits::Resampler;

/// Linear-interpolation resampler. Good enough for scoring, where both
/// buffers go through the same conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearResampler;

impl Resampler for LinearResampler {
    fn resample(&self, samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64> {
        if from_rate == to_rate || from_rate == 0 || to_rate == 0 || samples.is_empty() {
            return samples.to_vec();
        }

        let ratio = from_rate as f64 / to_rate as f64;
        let out_len = ((samples.len() as f64) / ratio).round().max(1.0) as usize;
        let last = samples.len() - 1;

        (0..out_len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = pos as usize;
                if idx >= last {
                    return samples[last];
                }
                let frac = pos - idx as f64;
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            })
            .collect()
    }
}
