//! Window functions for spectral analysis.

/// Window applied before the FFT to reduce spectral leakage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// Rectangular (no window).
    Rectangular,
    /// Hann window (cosine-squared).
    #[default]
    Hann,
    /// Hamming window.
    Hamming,
    /// Blackman window.
    Blackman,
}

impl WindowFunction {
    /// Generate window coefficients for a frame of `size` samples.
    pub fn generate(&self, size: usize) -> Vec<f32> {
        let n = size as f32;
        (0..size)
            .map(|i| {
                let x = i as f32;
                match self {
                    Self::Rectangular => 1.0,
                    Self::Hann => 0.5 * (1.0 - (std::f32::consts::TAU * x / n).cos()),
                    Self::Hamming => 0.54 - 0.46 * (std::f32::consts::TAU * x / n).cos(),
                    Self::Blackman => {
                        0.42 - 0.5 * (std::f32::consts::TAU * x / n).cos()
                            + 0.08 * (2.0 * std::f32::consts::TAU * x / n).cos()
                    }
                }
            })
            .collect()
    }

    /// Coherent gain of the window, for amplitude correction.
    pub fn coherent_gain(&self) -> f32 {
        match self {
            Self::Rectangular => 1.0,
            Self::Hann => 0.5,
            Self::Hamming => 0.54,
            Self::Blackman => 0.42,
        }
    }
}
