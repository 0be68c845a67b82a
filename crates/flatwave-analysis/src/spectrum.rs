//! Magnitude spectra and transfer functions via rustfft.

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::window::WindowFunction;

/// One-sided magnitude spectrum of a real signal.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Magnitudes for bins `0..=n/2`.
    pub magnitudes: Vec<f32>,
    /// Frequency resolution in Hz per bin.
    pub bin_hz: f32,
}

impl Spectrum {
    /// Frequency of the strongest bin between `min_hz` and `max_hz`.
    pub fn dominant_hz(&self, min_hz: f32, max_hz: f32) -> Option<f32> {
        let lo = (min_hz / self.bin_hz).floor() as usize;
        let hi = ((max_hz / self.bin_hz).ceil() as usize).min(self.magnitudes.len() - 1);
        if hi <= lo {
            return None;
        }
        let (idx, _) = self.magnitudes[lo..=hi]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        Some((lo + idx) as f32 * self.bin_hz)
    }
}

/// Compute the one-sided magnitude spectrum of `samples`.
///
/// The signal is windowed, zero-padded to the next power of two, and
/// transformed with rustfft.
pub fn magnitude_spectrum(samples: &[f32], sample_rate: f32, window: WindowFunction) -> Spectrum {
    let n = samples.len().next_power_of_two().max(2);
    let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(n);

    let coeffs = window.generate(samples.len());
    buffer.extend(
        samples
            .iter()
            .zip(&coeffs)
            .map(|(&s, &w)| Complex::new(s * w, 0.0)),
    );
    buffer.resize(n, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let magnitudes = buffer[..=n / 2].iter().map(|c| c.norm()).collect();
    Spectrum {
        magnitudes,
        bin_hz: sample_rate / n as f32,
    }
}

/// Magnitude of the transfer function between an excitation sequence and the
/// response recorded at a listener, `|FFT(output)| / |FFT(input)|`.
///
/// Bins where the input magnitude is negligible are set to zero rather than
/// amplified to garbage.
pub fn transfer_magnitude(input: &[f32], output: &[f32], sample_rate: f32) -> Spectrum {
    let len = input.len().max(output.len());
    let n = len.next_power_of_two().max(2);

    let run = |samples: &[f32]| -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        buffer.resize(n, Complex::new(0.0, 0.0));
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);
        buffer
    };

    let in_spec = run(input);
    let out_spec = run(output);

    let in_peak = in_spec[..=n / 2]
        .iter()
        .map(|c| c.norm())
        .fold(0.0f32, f32::max);
    let floor = in_peak * 1e-4;

    let magnitudes = in_spec[..=n / 2]
        .iter()
        .zip(&out_spec[..=n / 2])
        .map(|(i, o)| {
            let denom = i.norm();
            if denom > floor {
                o.norm() / denom
            } else {
                0.0
            }
        })
        .collect();

    Spectrum {
        magnitudes,
        bin_hz: sample_rate / n as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peak_at_expected_bin() {
        let sample_rate = 8000.0;
        let samples: Vec<f32> = (0..4096)
            .map(|i| (std::f32::consts::TAU * 1000.0 * i as f32 / sample_rate).sin())
            .collect();

        let spectrum = magnitude_spectrum(&samples, sample_rate, WindowFunction::Hann);
        let peak = spectrum.dominant_hz(100.0, 3000.0).unwrap();
        assert!(
            (peak - 1000.0).abs() < 2.0 * spectrum.bin_hz,
            "peak at {} Hz",
            peak
        );
    }

    #[test]
    fn transfer_of_identical_signals_is_unity() {
        let samples: Vec<f32> = (0..1024).map(|i| ((i * 7919) % 31) as f32 / 31.0 - 0.5).collect();
        let spectrum = transfer_magnitude(&samples, &samples, 44100.0);

        let mid = spectrum.magnitudes.len() / 4;
        assert!(
            (spectrum.magnitudes[mid] - 1.0).abs() < 1e-3,
            "expected unity transfer, got {}",
            spectrum.magnitudes[mid]
        );
    }

    #[test]
    fn transfer_gates_empty_input_bins() {
        let input = vec![0.0f32; 256];
        let output: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
        let spectrum = transfer_magnitude(&input, &output, 44100.0);
        assert!(spectrum.magnitudes.iter().all(|&m| m == 0.0));
    }
}
