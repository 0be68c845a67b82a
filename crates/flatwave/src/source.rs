//! Excitation signal generation.
//!
//! Sources are rendered up-front into a read-only sample sequence; the
//! engine consumes one sample per step and injects it on the excitation
//! faces selected by a [`SourceDirection`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Which faces of the excitation region receive injected velocity.
///
/// Components are -1, 0, or +1 and multiply the source sample on the
/// corresponding face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDirection {
    /// Weight on left faces.
    pub left: i8,
    /// Weight on bottom faces.
    pub down: i8,
    /// Weight on right faces.
    pub right: i8,
    /// Weight on top faces.
    pub up: i8,
}

impl SourceDirection {
    /// Radiate outward on all four faces (point source in open air).
    pub fn omni() -> Self {
        Self {
            left: -1,
            down: -1,
            right: 1,
            up: 1,
        }
    }

    /// Drive flow along +x only (glottal end of a tube).
    pub fn rightward() -> Self {
        Self {
            left: 0,
            down: 0,
            right: 1,
            up: 0,
        }
    }
}

/// The excitation waveform families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Pure tone at the given frequency.
    Sinusoid {
        /// Tone frequency in Hz.
        frequency_hz: f32,
    },
    /// Gaussian pulse `exp(-((t - 6tau)/tau)^2)` with `tau = 0.5/f`.
    Gaussian {
        /// Controls the pulse width via tau = 0.5/f.
        frequency_hz: f32,
    },
    /// Band-limited broadband impulse with a flat response between the
    /// bounds; used to extract transfer functions.
    Impulse {
        /// Lower band edge in Hz.
        min_hz: f32,
        /// Upper band edge in Hz.
        max_hz: f32,
    },
    /// Seeded noise, white or pink. Deterministic for a given seed.
    Noise {
        /// RNG seed.
        seed: u64,
        /// Apply the pink filter.
        pink: bool,
    },
}

/// A source selection plus output amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Waveform family.
    pub kind: SourceKind,
    /// Peak amplitude folded into the rendered samples.
    pub amplitude: f32,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            kind: SourceKind::Sinusoid { frequency_hz: 440.0 },
            amplitude: 1.0,
        }
    }
}

/// A pre-rendered excitation sequence.
#[derive(Debug, Clone)]
pub struct SourceSignal {
    samples: Vec<f32>,
}

impl SourceSignal {
    /// Render `steps` samples of the requested source at time step `dt`.
    pub fn render(spec: &SourceSpec, dt: f32, steps: u64) -> Self {
        let n = steps as usize;
        let amplitude = spec.amplitude;
        let samples = match spec.kind {
            SourceKind::Sinusoid { frequency_hz } => (0..n)
                .map(|i| {
                    let t = i as f32 * dt;
                    amplitude * (std::f32::consts::TAU * frequency_hz * t).sin()
                })
                .collect(),
            SourceKind::Gaussian { frequency_hz } => {
                let tau = 0.5 / frequency_hz;
                (0..n)
                    .map(|i| {
                        let t = i as f32 * dt;
                        let arg = (t - 6.0 * tau) / tau;
                        amplitude * (-arg * arg).exp()
                    })
                    .collect()
            }
            SourceKind::Impulse { min_hz, max_hz } => band_limited_impulse(min_hz, max_hz, amplitude, dt, n),
            SourceKind::Noise { seed, pink } => render_noise(seed, pink, amplitude, n),
        };
        Self { samples }
    }

    /// The sample for a step; zero once the sequence is exhausted.
    #[inline]
    pub fn sample(&self, step: u64) -> f32 {
        self.samples.get(step as usize).copied().unwrap_or(0.0)
    }

    /// Number of rendered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The full rendered sequence.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Difference of two windowed sinc kernels: flat passband between the band
/// edges, Hann-windowed to tame ripple. Peak-normalized to `amplitude`.
fn band_limited_impulse(min_hz: f32, max_hz: f32, amplitude: f32, dt: f32, steps: usize) -> Vec<f32> {
    const KERNEL_LEN: usize = 1023;
    let len = KERNEL_LEN.min(steps.max(1));
    let center = (len - 1) as f32 / 2.0;

    let sinc = |x: f32| -> f32 {
        if x.abs() < 1e-6 {
            1.0
        } else {
            let px = std::f32::consts::PI * x;
            px.sin() / px
        }
    };

    let mut kernel: Vec<f32> = (0..len)
        .map(|i| {
            let t = (i as f32 - center) * dt;
            let hann = 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / len as f32).cos());
            let high = 2.0 * max_hz * sinc(2.0 * max_hz * t);
            let low = 2.0 * min_hz * sinc(2.0 * min_hz * t);
            (high - low) * hann
        })
        .collect();

    let peak = kernel.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak > 0.0 {
        for s in &mut kernel {
            *s *= amplitude / peak;
        }
    }
    kernel.resize(steps, 0.0);
    kernel
}

fn render_noise(seed: u64, pink: bool, amplitude: f32, steps: usize) -> Vec<f32> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = [0.0f32; 7];

    (0..steps)
        .map(|_| {
            let white: f32 = rng.gen_range(-1.0..1.0) * amplitude;
            if !pink {
                return white;
            }
            // Paul Kellet's pink filter.
            state[0] = 0.99886 * state[0] + white * 0.0555179;
            state[1] = 0.99332 * state[1] + white * 0.0750759;
            state[2] = 0.96900 * state[2] + white * 0.1538520;
            state[3] = 0.86650 * state[3] + white * 0.3104856;
            state[4] = 0.55000 * state[4] + white * 0.5329522;
            state[5] = -0.7616 * state[5] - white * 0.0168980;
            let out = state[0]
                + state[1]
                + state[2]
                + state[3]
                + state[4]
                + state[5]
                + state[6]
                + white * 0.5362;
            state[6] = white * 0.115926;
            out * 0.11
        })
        .collect()
}
