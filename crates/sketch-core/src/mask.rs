//! Noisy ellipse mask.
//!
//! A ring of vertices around an ellipse inset from the surface edges. Each
//! frame every vertex's target is pushed in or out along its ray by a noise
//! sample, the whole ring drifts slowly by up to `noise_distance` pixels, and
//! a per-vertex 2-D spring follows that target. The springs'
//! positions, joined in angular order, form the closed polygon that clips
//! whatever the caller draws inside [`NoisyEllipseMask::apply_mask`].

use crate::config::MaskConfig;
use crate::error::SketchResult;
use crate::noise::{VertexSeed, noise, vertex_seed};
use crate::spring::Spring;
use crate::surface::{ClipScope, Surface};
use kurbo::{BezPath, Point, Shape, Size, Vec2};
use std::cell::Cell;
use std::f64::consts::TAU;

/// Drift samples noise this much slower than the per-vertex wobble.
const DRIFT_RATE: f64 = 0.1;
const DRIFT_SEED_X: f64 = 41.0;
const DRIFT_SEED_Y: f64 = 83.0;

/// Center and semi-axes of the unperturbed ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseGeometry {
    pub center: Point,
    /// Horizontal and vertical semi-axes.
    pub radii: Vec2,
}

impl EllipseGeometry {
    /// Ellipse inset by `margin` from a surface of `size`.
    /// `None` while the surface is too small to hold it.
    pub fn from_size(size: Size, margin: f64) -> Option<Self> {
        let rx = size.width / 2.0 - margin;
        let ry = size.height / 2.0 - margin;
        if !(rx > 0.0 && ry > 0.0) {
            return None;
        }
        Some(Self {
            center: Point::new(size.width / 2.0, size.height / 2.0),
            radii: Vec2::new(rx, ry),
        })
    }

    /// Distance from the center to the ellipse along `angle`.
    pub fn radius_at(&self, angle: f64) -> f64 {
        let (sin, cos) = angle.sin_cos();
        let (a, b) = (self.radii.x, self.radii.y);
        a * b / (b * cos).hypot(a * sin)
    }

    pub fn point_at(&self, angle: f64) -> Point {
        self.center + Vec2::from_angle(angle) * self.radius_at(angle)
    }
}

#[derive(Debug, Clone)]
struct MaskVertex {
    angle: f64,
    seed: VertexSeed,
    spring: Spring<Vec2>,
}

/// Marks the mask as clipping until dropped.
struct ClippingFlag<'a>(&'a Cell<bool>);

impl Drop for ClippingFlag<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// An organically wobbling elliptical clip region.
#[derive(Debug)]
pub struct NoisyEllipseMask {
    config: MaskConfig,
    size: Size,
    geometry: Option<EllipseGeometry>,
    time: f64,
    vertices: Vec<MaskVertex>,
    /// Springs have been placed on the first valid geometry.
    primed: bool,
    clipping: Cell<bool>,
}

impl NoisyEllipseMask {
    /// Build a mask for a surface of `size`.
    ///
    /// A zero-sized surface is accepted; the mask stays "not ready" until
    /// [`resize`](Self::resize) reports a usable size.
    pub fn new(size: Size, config: MaskConfig) -> SketchResult<Self> {
        config.validate()?;
        let count = config.ellipse_vertices;
        let vertices = (0..count)
            .map(|i| {
                Ok(MaskVertex {
                    angle: TAU * i as f64 / count as f64,
                    seed: vertex_seed(i, count, config.noise_distance),
                    spring: Spring::new(Vec2::ZERO, config.spring())?,
                })
            })
            .collect::<SketchResult<Vec<_>>>()?;

        let mut mask = Self {
            config,
            size: Size::ZERO,
            geometry: None,
            time: 0.0,
            vertices,
            primed: false,
            clipping: Cell::new(false),
        };
        mask.resize(size);
        log::debug!(
            "noisy mask: {} vertices, surface {}x{}, ready={}",
            count,
            size.width,
            size.height,
            mask.is_ready()
        );
        Ok(mask)
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Track the surface size. Cheap when nothing changed.
    ///
    /// Springs keep their position and velocity and glide to the new
    /// geometry over the following updates. The very first usable size
    /// places them directly on the ellipse.
    pub fn resize(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.geometry = EllipseGeometry::from_size(size, self.config.margin);

        let Some(geometry) = self.geometry else {
            log::trace!("noisy mask not ready at {}x{}", size.width, size.height);
            return;
        };
        if !self.primed {
            let (time, strength) = (self.time, self.config.noise_strength);
            let drift = self.drift();
            for vertex in &mut self.vertices {
                let target = vertex_target(vertex, &geometry, time, strength) + drift;
                vertex.spring.snap_to(target);
            }
            self.primed = true;
        } else {
            log::trace!("noisy mask re-targeting to {}x{}", size.width, size.height);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn geometry(&self) -> Option<EllipseGeometry> {
        self.geometry
    }

    /// Accumulated noise time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance noise time and step every vertex spring by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        if !(dt >= 0.0) {
            return;
        }
        let Some(geometry) = self.geometry else {
            return;
        };
        self.time += dt * self.config.noise_speed;

        let (time, strength) = (self.time, self.config.noise_strength);
        let drift = self.drift();
        for vertex in &mut self.vertices {
            let target = vertex_target(vertex, &geometry, time, strength) + drift;
            vertex.spring.target = target;
            vertex.spring.step(dt);
        }
    }

    /// Offset shared by every vertex target at the current time.
    ///
    /// Zero at time zero and never longer than `noise_distance` on either
    /// axis.
    pub fn drift(&self) -> Vec2 {
        let t = self.time * DRIFT_RATE;
        let wander = |seed: f64| (noise(t, seed) - noise(0.0, seed)) * 0.5;
        Vec2::new(wander(DRIFT_SEED_X), wander(DRIFT_SEED_Y)) * self.config.noise_distance
    }

    /// Current spring-smoothed vertex positions, in angular order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.vertices.iter().map(|v| v.spring.position.to_point())
    }

    /// Point on the unperturbed ellipse for vertex `index`.
    pub fn base_point(&self, index: usize) -> Option<Point> {
        let geometry = self.geometry?;
        let vertex = self.vertices.get(index)?;
        Some(geometry.point_at(vertex.angle))
    }

    /// Closed polygon through the current vertex positions.
    pub fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.vertices();
        if let Some(first) = points.next() {
            path.move_to(first);
            for p in points {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }

    /// Whether `point` lies inside the current polygon.
    pub fn contains(&self, point: Point) -> bool {
        self.is_ready() && self.path().contains(point)
    }

    /// Clip `surface` to the mask while `draw` runs.
    ///
    /// The surface state is restored afterwards on every exit path,
    /// including a panic inside `draw`. Returns `None` without drawing when
    /// the mask or surface is not sized yet, or when called from inside
    /// another `apply_mask` on the same mask.
    pub fn apply_mask<S, R>(&self, surface: &mut S, draw: impl FnOnce(&mut S) -> R) -> Option<R>
    where
        S: Surface + ?Sized,
    {
        let size = surface.size();
        if !self.is_ready() || !(size.width > 0.0 && size.height > 0.0) {
            log::trace!("noisy mask skipped: surface not ready");
            return None;
        }
        if self.clipping.replace(true) {
            log::warn!("apply_mask called re-entrantly; skipping nested draw");
            return None;
        }
        let _flag = ClippingFlag(&self.clipping);

        let path = self.path();
        let mut scope = ClipScope::new(surface, &path);
        Some(draw(&mut *scope))
    }
}

fn vertex_target(vertex: &MaskVertex, geometry: &EllipseGeometry, time: f64, strength: f64) -> Vec2 {
    let radius = geometry.radius_at(vertex.angle) + vertex.seed.sample(time) * strength;
    geometry.center.to_vec2() + Vec2::from_angle(vertex.angle) * radius
}
