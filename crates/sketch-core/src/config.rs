//! Spring and mask configuration.
//!
//! Field names deserialize from camelCase so the option objects a hosting
//! page already writes (`{ margin: 40, ellipseVertices: 320, ... }`) parse
//! directly.

use crate::error::{SketchError, SketchResult};
use serde::{Deserialize, Serialize};

/// Frequency / half-life pair that parameterizes a [`crate::Spring`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringConfig {
    /// Oscillation rate in Hz.
    pub frequency: f64,
    /// Seconds for the displacement envelope to halve.
    pub half_life: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            half_life: 0.1,
        }
    }
}

impl SpringConfig {
    pub const fn new(frequency: f64, half_life: f64) -> Self {
        Self {
            frequency,
            half_life,
        }
    }

    pub fn validate(&self) -> SketchResult<()> {
        check_positive("frequency", self.frequency)?;
        check_positive("half_life", self.half_life)?;
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> SketchResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SketchError::InvalidSpring { field, value })
    }
}

/// Configuration for a [`crate::NoisyEllipseMask`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaskConfig {
    /// Gap between the surface edge and the unperturbed ellipse, in pixels.
    pub margin: f64,
    /// Number of boundary vertices. Must be at least 3.
    pub ellipse_vertices: usize,
    /// Maximum radial displacement added by noise, in pixels.
    pub noise_strength: f64,
    /// Noise time advanced per second of animation.
    pub noise_speed: f64,
    /// Radius of the circle each vertex traces through noise space.
    /// Larger values give more, tighter bumps around the ring.
    pub noise_distance: f64,
    pub spring_frequency: f64,
    pub spring_half_life: f64,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            margin: 40.0,
            ellipse_vertices: 320,
            noise_strength: 50.0,
            noise_speed: 2.0,
            noise_distance: 15.0,
            spring_frequency: 1.0,
            spring_half_life: 0.1,
        }
    }
}

impl MaskConfig {
    /// Parse a JSON option object and validate it.
    pub fn from_json(text: &str) -> SketchResult<Self> {
        let config: MaskConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn spring(&self) -> SpringConfig {
        SpringConfig::new(self.spring_frequency, self.spring_half_life)
    }

    pub fn validate(&self) -> SketchResult<()> {
        if self.ellipse_vertices < 3 {
            return Err(SketchError::InvalidMask(format!(
                "ellipseVertices must be at least 3, got {}",
                self.ellipse_vertices
            )));
        }
        for (name, value) in [
            ("margin", self.margin),
            ("noiseStrength", self.noise_strength),
            ("noiseSpeed", self.noise_speed),
            ("noiseDistance", self.noise_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SketchError::InvalidMask(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        self.spring().validate()
    }
}
