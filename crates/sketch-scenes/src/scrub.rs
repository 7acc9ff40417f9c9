//! Scrub: press to open a wobbly window, drag vertically to flip frames.
//!
//! A scalar spring drives the window radius toward half the canvas width
//! while the pointer is held and back to zero on release. The window is a
//! 32-gon whose radius wobbles outward by up to 30 px. Frames are drawn
//! procedurally: a disc orbiting the center, one step per frame.

use crate::{Sketch, SketchKind, is_sized, unit};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use sketch_core::{
    BezPath, ClipScope, Color, Point, Pointer, Rect, SketchResult, Size, Spring, SpringConfig,
    Surface, Vec2, noise,
};
use std::f64::consts::TAU;

pub const FRAME_COUNT: usize = 16;
/// Canvas heights of drag needed to run through all frames, inverted.
const DRAG_SENSITIVITY: f64 = 2.8;
/// Pixels of vertical travel before a press counts as a drag.
const DRAG_THRESHOLD: f64 = 2.0;
const WINDOW_VERTICES: usize = 32;
const WOBBLE: f64 = 30.0;
const WOBBLE_SPEED: f64 = 6.0;
const REVEAL_SPRING: SpringConfig = SpringConfig::new(1.0, 0.1);
const HAND_WIDTH: f64 = 4.0;

pub struct ScrubSketch {
    reveal: Spring,
    frame: usize,
    drag_start_y: Option<f64>,
    dragging: bool,
    wobble_time: f64,
    /// Per-sketch offset into the noise field.
    wobble_seed: f64,
    size: Size,
}

impl ScrubSketch {
    pub fn new(seed: u64) -> SketchResult<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);
        Ok(Self {
            reveal: Spring::new(0.0, REVEAL_SPRING)?,
            frame: 0,
            drag_start_y: None,
            dragging: false,
            wobble_time: 0.0,
            wobble_seed: unit(&mut rng) * 1000.0,
            size: Size::ZERO,
        })
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn radius(&self) -> f64 {
        self.reveal.position
    }

    /// Frame for a vertical drag of `dy` pixels on a canvas `height` tall.
    pub fn frame_for_drag(dy: f64, height: f64) -> usize {
        let normalized = dy / height * DRAG_SENSITIVITY;
        let offset = (normalized * (FRAME_COUNT - 1) as f64).round();
        offset.clamp(0.0, (FRAME_COUNT - 1) as f64) as usize
    }

    fn window(&self) -> BezPath {
        let center = Point::new(self.size.width / 2.0, self.size.height / 2.0);
        let radius = self.reveal.position.max(0.0);
        let mut path = BezPath::new();
        for i in 0..WINDOW_VERTICES {
            let angle = TAU * i as f64 / WINDOW_VERTICES as f64;
            let wobble = noise(self.wobble_time, self.wobble_seed + i as f64 * 7.3) * 0.5 + 0.5;
            let p = center + Vec2::from_angle(angle) * (radius + wobble * WOBBLE);
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }
}

impl Sketch for ScrubSketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Scrub
    }

    fn update(&mut self, dt: f64, pointer: &Pointer, size: Size) {
        self.size = size;
        if !is_sized(size) {
            return;
        }
        self.wobble_time += dt * WOBBLE_SPEED;

        let y = pointer.position().map(|p| p.y);
        if pointer.just_pressed() {
            self.drag_start_y = y;
            self.dragging = false;
            self.frame = 0;
        }
        if pointer.is_pressed()
            && let (Some(start), Some(y)) = (self.drag_start_y, y)
        {
            let dy = y - start;
            if dy.abs() > DRAG_THRESHOLD {
                self.dragging = true;
            }
            if self.dragging {
                self.frame = Self::frame_for_drag(dy, size.height);
            }
        }
        if pointer.just_released() {
            self.drag_start_y = None;
            self.dragging = false;
            self.frame = 0;
        }

        self.reveal.target = if pointer.is_pressed() {
            size.width / 2.0
        } else {
            0.0
        };
        self.reveal.step(dt);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let size = self.size;
        if !is_sized(size) {
            return;
        }
        let canvas = Rect::from_origin_size(Point::ZERO, size);
        surface.fill_rect(canvas, Color::BLACK);

        let mut window = ClipScope::new(surface, &self.window());
        window.fill_rect(canvas, Color::WHITE);

        let center = canvas.center();
        let orbit = size.width.min(size.height) * 0.2;
        let angle = TAU * self.frame as f64 / FRAME_COUNT as f64 - TAU / 4.0;
        let disc = center + Vec2::from_angle(angle) * orbit;
        window.stroke_circle(center, orbit, Color::BLACK.with_alpha(0.2), 1.0);
        window.stroke_line(center, disc, Color::BLACK, HAND_WIDTH);
        window.fill_circle(disc, orbit * 0.25, Color::BLACK);
    }
}
