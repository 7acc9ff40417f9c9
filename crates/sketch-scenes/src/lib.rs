//! Sketch scenes.
//!
//! Each sketch owns its whole state in one struct and is driven by the host
//! loop through the [`Sketch`] trait: `update` once per frame with the
//! elapsed time, the pointer and the live surface size, then `draw`.

pub mod eyes;
pub mod fly;
pub mod gather;
pub mod scrub;

use rand::Rng;
use rand_pcg::Pcg32;
use sketch_core::{MaskConfig, Point, Pointer, SketchError, SketchResult, Size, Surface};
use std::fmt;
use std::str::FromStr;

pub use eyes::EyesSketch;
pub use fly::FlySketch;
pub use gather::GatherSketch;
pub use scrub::ScrubSketch;

/// The available sketches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchKind {
    /// Catch a wandering fly inside the noisy mask.
    Fly,
    /// Reveal a row of eyes one click at a time.
    Eyes,
    /// Press to open a spring-driven reveal, drag to scrub frames.
    Scrub,
    /// A swarm of springs that gathers into columns.
    Gather,
}

impl SketchKind {
    pub const ALL: [SketchKind; 4] = [Self::Fly, Self::Eyes, Self::Scrub, Self::Gather];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fly => "fly",
            Self::Eyes => "eyes",
            Self::Scrub => "scrub",
            Self::Gather => "gather",
        }
    }
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fly" => Ok(Self::Fly),
            "eyes" => Ok(Self::Eyes),
            "scrub" => Ok(Self::Scrub),
            "gather" => Ok(Self::Gather),
            other => Err(SketchError::Config(format!("unknown sketch: {other:?}"))),
        }
    }
}

/// A frame-driven interactive sketch.
pub trait Sketch {
    fn kind(&self) -> SketchKind;

    /// Advance by `dt` seconds. `size` is the surface size this frame.
    fn update(&mut self, dt: f64, pointer: &Pointer, size: Size);

    /// Paint the current state. Never mutates the scene.
    fn draw(&self, surface: &mut dyn Surface);

    /// Whether the sketch has reached its end and the host may move on.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Build a sketch by kind. `mask` configures sketches that use the noisy mask.
pub fn create_sketch(
    kind: SketchKind,
    size: Size,
    seed: u64,
    mask: MaskConfig,
) -> SketchResult<Box<dyn Sketch>> {
    log::debug!("creating sketch {kind} (seed {seed})");
    Ok(match kind {
        SketchKind::Fly => Box::new(FlySketch::new(size, seed, mask)?),
        SketchKind::Eyes => Box::new(EyesSketch::new(size, seed, mask)?),
        SketchKind::Scrub => Box::new(ScrubSketch::new(seed)?),
        SketchKind::Gather => Box::new(GatherSketch::new(seed)?),
    })
}

// ─── Shared helpers ─────────────────────────────────────────────────────

pub(crate) fn is_sized(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit(rng: &mut Pcg32) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// Uniform point inside `[0, w) × [0, h)`.
pub(crate) fn random_point(rng: &mut Pcg32, size: Size) -> Point {
    Point::new(unit(rng) * size.width, unit(rng) * size.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sketch_core::RecordingSurface;

    #[test]
    fn kind_names_round_trip() {
        for kind in SketchKind::ALL {
            assert_eq!(kind.name().parse::<SketchKind>().unwrap(), kind);
        }
        assert_eq!(" Gather ".parse::<SketchKind>().unwrap(), SketchKind::Gather);
        assert!("mandala".parse::<SketchKind>().is_err());
    }

    #[test]
    fn every_sketch_survives_an_unsized_first_frame() {
        let pointer = Pointer::new();
        for kind in SketchKind::ALL {
            let mut sketch = create_sketch(kind, Size::ZERO, 7, MaskConfig::default()).unwrap();
            assert_eq!(sketch.kind(), kind);
            sketch.update(1.0 / 60.0, &pointer, Size::ZERO);
            let mut surface = RecordingSurface::new(0.0, 0.0);
            sketch.draw(&mut surface);
            assert_eq!(surface.state_depth(), 0, "{kind} left the surface unbalanced");
            assert!(!sketch.is_finished());
        }
    }

    #[test]
    fn bad_mask_config_fails_creation() {
        let config = MaskConfig {
            ellipse_vertices: 1,
            ..MaskConfig::default()
        };
        assert!(create_sketch(SketchKind::Fly, Size::new(100.0, 100.0), 1, config).is_err());
    }
}
