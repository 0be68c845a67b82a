//! Run configuration.
//!
//! Everything a run needs is collected in [`SimulationConfig`], validated
//! once before any allocation happens. Selector errors surface as
//! [`FlatwaveError::Config`](crate::error::FlatwaveError) here rather than
//! somewhere down in the build.

use serde::{Deserialize, Serialize};

use crate::error::{FlatwaveError, Result};
use crate::source::{SourceKind, SourceSpec};

/// Propagation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Pure 2D: all depth planes are 1.
    #[serde(rename = "2d")]
    TwoD,
    /// Height-field corrected 2D: depth planes set by the geometry
    /// builder from the scene's vertical extent.
    #[serde(rename = "2_5d")]
    TwoPointFiveD,
}

/// Scene selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Empty domain with a point source at the center.
    OpenAir,
    /// Horizontal tube closed at the glottal end, open at the other.
    ClosedTube,
    /// Open air with a short reflecting wall segment near the source.
    VerticalWall,
    /// Horizontal tube open at both ends.
    OpenTube,
    /// Vocal tract built from a 44-section area function.
    Vowel,
}

/// Vowel selector for the area-function tract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vowel {
    /// Open back vowel /a/.
    A,
    /// Close back rounded vowel /u/.
    U,
    /// Close front vowel /i/.
    I,
}

/// Absorbing-layer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmlSettings {
    /// Attach the graded layer stack.
    pub enabled: bool,
    /// Number of rings in the stack.
    pub layers: u8,
}

impl Default for PmlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            layers: 6,
        }
    }
}

impl PmlSettings {
    /// Layers passed to the grid: `None` when disabled.
    pub fn active_layers(&self) -> Option<u8> {
        self.enabled.then_some(self.layers)
    }
}

/// Full configuration of a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Propagation mode.
    pub mode: Mode,
    /// Absorbing-layer settings.
    pub pml: PmlSettings,
    /// Scene selector.
    pub scene: SceneKind,
    /// Vowel, required when `scene` is [`SceneKind::Vowel`].
    pub vowel: Option<Vowel>,
    /// Interior domain width in cells. Ignored for the vowel scene, which
    /// derives its own frame.
    pub domain_w: usize,
    /// Interior domain height in cells. Ignored for the vowel scene.
    pub domain_h: usize,
    /// Air columns between the glottal end and the open end; tube scenes
    /// only.
    pub tube_length: usize,
    /// Air rows across the tube; tube scenes only.
    pub tube_width: usize,
    /// Sample rate multiplier; the run samples at 44100 x this.
    pub srate_multiplier: u32,
    /// Excitation signal.
    pub source: SourceSpec,
    /// Total simulated time in milliseconds.
    pub duration_ms: f32,
    /// Deliver a field snapshot every this many steps, when set.
    pub snapshot_every: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: Mode::TwoD,
            pml: PmlSettings::default(),
            scene: SceneKind::OpenAir,
            vowel: None,
            domain_w: 100,
            domain_h: 100,
            tube_length: 80,
            tube_width: 5,
            srate_multiplier: 1,
            source: SourceSpec::default(),
            duration_ms: 50.0,
            snapshot_every: None,
        }
    }
}

impl SimulationConfig {
    /// Check every selector and dimension before anything is built.
    pub fn validate(&self) -> Result<()> {
        if self.srate_multiplier == 0 {
            return Err(FlatwaveError::config("srate_multiplier must be positive"));
        }
        if !(self.duration_ms > 0.0) {
            return Err(FlatwaveError::config("duration_ms must be positive"));
        }
        if self.pml.enabled && self.pml.layers == 0 {
            return Err(FlatwaveError::config(
                "pml.layers must be positive when pml is enabled",
            ));
        }
        if let Some(every) = self.snapshot_every {
            if every == 0 {
                return Err(FlatwaveError::config("snapshot_every must be positive"));
            }
        }

        match self.scene {
            SceneKind::Vowel => {
                if self.vowel.is_none() {
                    return Err(FlatwaveError::config("scene 'vowel' requires a vowel"));
                }
            }
            _ => {
                if self.vowel.is_some() {
                    return Err(FlatwaveError::config(
                        "vowel is only valid with scene 'vowel'",
                    ));
                }
            }
        }

        match self.scene {
            SceneKind::OpenAir | SceneKind::VerticalWall => {
                if self.domain_w < 4 || self.domain_h < 4 {
                    return Err(FlatwaveError::config(format!(
                        "domain must be at least 4x4 cells, got {}x{}",
                        self.domain_h, self.domain_w
                    )));
                }
            }
            SceneKind::ClosedTube | SceneKind::OpenTube => {
                if self.tube_length < 2 || self.tube_width < 1 {
                    return Err(FlatwaveError::config(format!(
                        "tube must be at least 2 cells long and 1 wide, got {}x{}",
                        self.tube_length, self.tube_width
                    )));
                }
                if self.domain_w < self.tube_length + 3 || self.domain_h < self.tube_width + 2 {
                    return Err(FlatwaveError::config(format!(
                        "tube {}x{} does not fit a {}x{} domain",
                        self.tube_length, self.tube_width, self.domain_h, self.domain_w
                    )));
                }
            }
            SceneKind::Vowel => {}
        }

        match self.source.kind {
            SourceKind::Sinusoid { frequency_hz } | SourceKind::Gaussian { frequency_hz } => {
                if !(frequency_hz > 0.0) {
                    return Err(FlatwaveError::config("source frequency must be positive"));
                }
            }
            SourceKind::Impulse { min_hz, max_hz } => {
                if !(min_hz >= 0.0 && max_hz > min_hz) {
                    return Err(FlatwaveError::config(
                        "impulse band must satisfy 0 <= min_hz < max_hz",
                    ));
                }
            }
            SourceKind::Noise { .. } => {}
        }

        if !self.source.amplitude.is_finite() {
            return Err(FlatwaveError::config("source amplitude must be finite"));
        }

        Ok(())
    }
}
