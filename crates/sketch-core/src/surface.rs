//! The host drawing surface and the scoped clip guard.
//!
//! `Surface` is the slice of a Canvas2D-style API the sketches use: state
//! save/restore, polygon paths, clipping, and a few filled/stroked shapes.
//! The browser implementation lives in `sketch-wasm`; [`RecordingSurface`]
//! is a headless implementation that records calls.

use crate::color::Color;
use kurbo::{BezPath, PathEl, Point, Rect, Size};
use std::ops::{Deref, DerefMut};

/// A 2-D drawing surface with a save/restore state stack.
pub trait Surface {
    /// Current size in pixels. May change between frames.
    fn size(&self) -> Size;

    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn close_path(&mut self);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64);
}

/// Replay a kurbo path as the surface's current path.
///
/// Curves are flattened to their end points; mask paths are polygons.
pub fn trace_path<S: Surface + ?Sized>(surface: &mut S, path: &BezPath) {
    surface.begin_path();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => surface.move_to(p),
            PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                surface.line_to(p)
            }
            PathEl::ClosePath => surface.close_path(),
        }
    }
}

/// Clip held for the lifetime of the guard.
///
/// Creating the scope saves the surface state and clips to `path`; dropping
/// it restores the state. The restore runs on every exit path: normal
/// return, early return through `?`, and panic unwinding.
pub struct ClipScope<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> ClipScope<'a, S> {
    pub fn new(surface: &'a mut S, path: &BezPath) -> Self {
        surface.save();
        trace_path(surface, path);
        surface.clip();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for ClipScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for ClipScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for ClipScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

// ─── Headless surface ───────────────────────────────────────────────────

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
    Clip,
    FillRect(Rect, Color),
    StrokeRect(Rect, Color, f64),
    FillCircle(Point, f64, Color),
    StrokeCircle(Point, f64, Color, f64),
    StrokeLine(Point, Point, Color, f64),
}

/// A [`Surface`] that draws nothing and remembers everything.
///
/// Tracks the save/restore depth and the stack of active clip polygons so
/// tests can check that scoped clipping leaves the state balanced.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    ops: Vec<SurfaceOp>,
    path: Vec<Point>,
    clips: Vec<Vec<Point>>,
    saved: Vec<usize>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of `save` calls not yet matched by `restore`.
    pub fn state_depth(&self) -> usize {
        self.saved.len()
    }

    /// Clip polygons currently intersected into the clip region.
    pub fn active_clips(&self) -> &[Vec<Point>] {
        &self.clips
    }

    /// Count recorded ops matching `pred`.
    pub fn count(&self, pred: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn save(&mut self) {
        self.saved.push(self.clips.len());
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        // Canvas ignores an unbalanced restore; so do we.
        if let Some(clip_len) = self.saved.pop() {
            self.clips.truncate(clip_len);
        }
        self.ops.push(SurfaceOp::Restore);
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.path.push(p);
        self.ops.push(SurfaceOp::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.path.push(p);
        self.ops.push(SurfaceOp::LineTo(p));
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn clip(&mut self) {
        self.clips.push(self.path.clone());
        self.ops.push(SurfaceOp::Clip);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(SurfaceOp::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.ops.push(SurfaceOp::StrokeRect(rect, color, width));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.ops.push(SurfaceOp::FillCircle(center, radius, color));
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64) {
        self.ops
            .push(SurfaceOp::StrokeCircle(center, radius, color, width));
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.ops.push(SurfaceOp::StrokeLine(from, to, color, width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn trace_replays_polygon() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        trace_path(&mut surface, &triangle());
        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo(Point::new(0.0, 0.0)),
                SurfaceOp::LineTo(Point::new(10.0, 0.0)),
                SurfaceOp::LineTo(Point::new(0.0, 10.0)),
                SurfaceOp::ClosePath,
            ]
        );
    }

    #[test]
    fn clip_scope_restores_on_drop() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        {
            let mut scope = ClipScope::new(&mut surface, &triangle());
            assert_eq!(scope.state_depth(), 1);
            assert_eq!(scope.active_clips().len(), 1);
            scope.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK);
        }
        assert_eq!(surface.state_depth(), 0);
        assert!(surface.active_clips().is_empty());
        assert_eq!(surface.ops().last(), Some(&SurfaceOp::Restore));
    }

    #[test]
    fn nested_saves_unwind_in_order() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.save();
        let outer = ClipScope::new(&mut surface, &triangle());
        drop(outer);
        assert_eq!(surface.state_depth(), 1);
        surface.restore();
        surface.restore();
        assert_eq!(surface.state_depth(), 0);
    }
}
