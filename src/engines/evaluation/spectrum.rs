use rustfft::{num_complex::Complex, FftPlanner};

/// Smallest power of two >= `n` (1 for n = 0)
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Mean squared error over the overlapping length of two buffers.
/// Infinite when there is no overlap.
pub fn time_domain_mse(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return f64::INFINITY;
    }

    let sum: f64 = a[..len]
        .iter()
        .zip(&b[..len])
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum();

    sum / len as f64
}

/// Magnitude spectrum of `samples` truncated or zero-padded to `n` points
pub fn magnitude_spectrum(planner: &mut FftPlanner<f64>, samples: &[f64], n: usize) -> Vec<f64> {
    let mut buffer: Vec<Complex<f64>> = (0..n)
        .map(|i| Complex::new(samples.get(i).copied().unwrap_or(0.0), 0.0))
        .collect();

    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer.iter().map(|c| c.norm()).collect()
}

/// Mean squared error between magnitude spectra.
///
/// Both buffers are cut or zero-padded to the next power of two at or above
/// their overlapping length, so the longer buffer still contributes its
/// samples up to that length.
pub fn frequency_domain_mse(a: &[f64], b: &[f64]) -> f64 {
    let overlap = a.len().min(b.len());
    if overlap == 0 {
        return f64::INFINITY;
    }

    let n = next_power_of_two(overlap);
    let mut planner = FftPlanner::new();
    let mag_a = magnitude_spectrum(&mut planner, a, n);
    let mag_b = magnitude_spectrum(&mut planner, b, n);

    let sum: f64 = mag_a
        .iter()
        .zip(&mag_b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum();

    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(1024), 1024);
        assert_eq!(next_power_of_two(1025), 2048);
    }

    #[test]
    fn test_time_mse_truncates_to_overlap() {
        let a = [1.0, 2.0, 3.0, 100.0];
        let b = [1.0, 2.0, 4.0];
        // Only the first three samples are compared: (0 + 0 + 1) / 3
        assert!((time_domain_mse(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_mse_no_overlap_is_infinite() {
        assert!(time_domain_mse(&[], &[1.0]).is_infinite());
    }

    #[test]
    fn test_identical_buffers_have_zero_error() {
        let signal: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin()).collect();
        assert_eq!(time_domain_mse(&signal, &signal), 0.0);
        assert_eq!(frequency_domain_mse(&signal, &signal), 0.0);
    }

    #[test]
    fn test_impulse_spectrum_is_flat() {
        let mut planner = FftPlanner::new();
        let spectrum = magnitude_spectrum(&mut planner, &[1.0], 8);

        assert_eq!(spectrum.len(), 8);
        for bin in spectrum {
            assert!((bin - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_frequency_mse_detects_scaling() {
        let signal: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
        let louder: Vec<f64> = signal.iter().map(|s| s * 2.0).collect();
        assert!(frequency_domain_mse(&signal, &louder) > 0.0);
    }
}
