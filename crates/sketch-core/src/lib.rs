//! Animation primitives shared by the sketches: a closed-form damped
//! spring, sine-sum noise, and the noisy ellipse clip mask, plus the
//! `Surface` trait they draw through.

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod mask;
pub mod noise;
pub mod spring;
pub mod surface;

pub use color::Color;
pub use config::{MaskConfig, SpringConfig};
pub use error::{SketchError, SketchResult};
pub use input::{Pointer, PointerEvent};
pub use mask::{EllipseGeometry, NoisyEllipseMask};
pub use noise::{VertexSeed, noise, vertex_seed};
pub use spring::{Animatable, Spring};
pub use surface::{ClipScope, RecordingSurface, Surface, SurfaceOp, trace_path};

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::{BezPath, Point, Rect, Size, Vec2};
