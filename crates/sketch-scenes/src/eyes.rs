//! Eyes: an arch of eyes above a mouth, revealed one click at a time.
//!
//! Only the first eye is open at the start. Clicking an open eye that has
//! not been clicked yet opens the next one; when every eye is open and
//! clicked, the mouth appears and the sketch is done. Irises follow the
//! pointer but never leave more than half of themselves outside the eyeball.

use crate::{Sketch, SketchKind, is_sized, unit};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use sketch_core::{
    BezPath, ClipScope, Color, MaskConfig, NoisyEllipseMask, Point, Pointer, Rect, SketchResult,
    Size, Surface, Vec2,
};
use std::f64::consts::{PI, TAU};

pub const EYE_COUNT: usize = 5;
const IRIS_SIZE: f64 = 150.0;
const EYEBALL_SIZE: f64 = 200.0;
const EYEBALL_STROKE: f64 = 3.0;
const CIRCLE_SEGMENTS: usize = 48;

const IRIS_COLOR: Color = Color::rgba(0.18, 0.32, 0.45, 1.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Eye {
    pub center: Point,
    pub iris: Point,
    pub clicked: bool,
}

impl Eye {
    fn new(center: Point) -> Self {
        Self {
            center,
            iris: center,
            clicked: false,
        }
    }

    fn radius(&self) -> f64 {
        EYEBALL_SIZE / 2.0
    }

    fn contains(&self, p: Point) -> bool {
        p.distance(self.center) <= self.radius()
    }

    /// Follow `target`, keeping at least half the iris inside the eyeball.
    fn look_at(&mut self, target: Point) {
        let max_distance = self.radius() - IRIS_SIZE / 4.0;
        let offset = target - self.center;
        let distance = offset.hypot();
        self.iris = if distance > max_distance {
            self.center + offset / distance * max_distance
        } else {
            target
        };
    }
}

pub struct EyesSketch {
    mask: NoisyEllipseMask,
    seed: u64,
    size: Size,
    eyes: Vec<Eye>,
    mouth: Option<Rect>,
    visible: usize,
    show_mouth: bool,
    /// Size the arch was built for.
    laid_out_for: Option<Size>,
}

impl EyesSketch {
    pub fn new(size: Size, seed: u64, mask: MaskConfig) -> SketchResult<Self> {
        Ok(Self {
            mask: NoisyEllipseMask::new(size, mask)?,
            seed,
            size,
            eyes: Vec::new(),
            mouth: None,
            visible: 1,
            show_mouth: false,
            laid_out_for: None,
        })
    }

    pub fn eyes(&self) -> &[Eye] {
        &self.eyes
    }

    /// Number of eyes currently open.
    pub fn visible_eyes(&self) -> usize {
        self.visible.min(self.eyes.len())
    }

    pub fn mouth(&self) -> Option<Rect> {
        self.mouth
    }

    pub fn mouth_shown(&self) -> bool {
        self.show_mouth
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Lay the eyes out again from a new seed and reset progress.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.laid_out_for = None;
        if is_sized(self.size) {
            self.lay_out();
        }
    }

    /// No eye clicked yet, so a resize may still rebuild the arch.
    fn layout_is_fresh(&self) -> bool {
        self.eyes.iter().all(|e| !e.clicked)
    }

    fn lay_out(&mut self) {
        let size = self.size;
        let mouth = Rect::from_center_size(
            (size.width / 2.0, size.height / 2.0),
            (size.width * 0.05, size.height * 0.3),
        );
        self.mouth = Some(mouth);
        let mut rng = Pcg32::seed_from_u64(self.seed);
        self.eyes = arch_positions(mouth, size, EYE_COUNT, EYEBALL_SIZE, &mut rng)
            .into_iter()
            .map(Eye::new)
            .collect();
        self.visible = 1;
        self.show_mouth = false;
        self.laid_out_for = Some(size);
        log::debug!("eyes laid out: {} of {EYE_COUNT} fit (seed {})", self.eyes.len(), self.seed);
    }

    fn handle_click(&mut self, p: Point) {
        let open = self.visible_eyes();
        let Some(i) = (0..open).find(|&i| !self.eyes[i].clicked && self.eyes[i].contains(p)) else {
            return;
        };
        self.eyes[i].clicked = true;
        if self.visible < self.eyes.len() {
            self.visible += 1;
        }
        let clicked = self.eyes.iter().filter(|e| e.clicked).count();
        if clicked == self.visible && self.visible == self.eyes.len() {
            self.show_mouth = true;
            log::info!("all {clicked} eyes clicked; mouth revealed");
        }
    }
}

/// Place up to `count` eyes on an arch above `mouth`.
///
/// Angles run from -π to 0 (the upper half circle) with seeded jitter on
/// angle and radius. Positions outside the top half of the canvas are
/// dropped, then any eye closer than 1.8 eye sizes to an earlier one.
pub fn arch_positions(
    mouth: Rect,
    canvas: Size,
    count: usize,
    eye_size: f64,
    rng: &mut Pcg32,
) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let center = mouth.center();
    let base_radius = mouth.width().max(mouth.height()) / 2.0 + eye_size * 1.5;
    let step = if count > 1 { PI / (count - 1) as f64 } else { 0.0 };

    let (min_x, max_x) = (eye_size, canvas.width - eye_size / 2.0);
    let (min_y, max_y) = (eye_size / 2.0, canvas.height / 2.0);

    let candidates = (0..count).filter_map(|i| {
        let angle = -PI + i as f64 * step + (unit(rng) - 0.5) * 0.2;
        let radius = base_radius + (unit(rng) - 0.5) * eye_size * 0.4;
        let p = center + Vec2::from_angle(angle) * radius;
        let inside = (min_x..=max_x).contains(&p.x) && (min_y..=max_y).contains(&p.y);
        inside.then_some(p)
    });

    let min_spacing = eye_size * 1.8;
    let mut placed: Vec<Point> = Vec::with_capacity(count);
    for p in candidates {
        if placed.iter().all(|q| q.distance(p) >= min_spacing) {
            placed.push(p);
        }
    }
    placed
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    for i in 0..CIRCLE_SEGMENTS {
        let p = center + Vec2::from_angle(TAU * i as f64 / CIRCLE_SEGMENTS as f64) * radius;
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

impl Sketch for EyesSketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Eyes
    }

    fn update(&mut self, dt: f64, pointer: &Pointer, size: Size) {
        self.size = size;
        self.mask.resize(size);
        self.mask.update(dt);

        if !is_sized(size) {
            return;
        }
        // Rebuild for a new size until the first eye is clicked.
        if self.laid_out_for != Some(size) && self.layout_is_fresh() {
            self.lay_out();
        }

        if let Some(p) = pointer.position() {
            if pointer.just_pressed() {
                self.handle_click(p);
            }
            let open = self.visible_eyes();
            for eye in &mut self.eyes[..open] {
                eye.look_at(p);
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.laid_out_for.is_none() {
            return;
        }
        let size = self.size;
        self.mask.apply_mask(surface, |s| {
            s.fill_rect(Rect::from_origin_size(Point::ZERO, size), Color::WHITE);
            for eye in &self.eyes[..self.visible_eyes()] {
                {
                    let mut eyeball = ClipScope::new(&mut *s, &circle_path(eye.center, eye.radius()));
                    eyeball.fill_circle(eye.iris, IRIS_SIZE / 2.0, IRIS_COLOR);
                    eyeball.fill_circle(eye.iris, IRIS_SIZE / 5.0, Color::BLACK);
                }
                s.stroke_circle(eye.center, eye.radius(), Color::BLACK, EYEBALL_STROKE);
            }
            if self.show_mouth
                && let Some(mouth) = self.mouth
            {
                s.fill_rect(mouth, Color::BLACK);
            }
        });
    }

    fn is_finished(&self) -> bool {
        self.show_mouth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{PointerEvent, RecordingSurface, SurfaceOp};

    const SIZE: Size = Size::new(4000.0, 4000.0);

    fn sketch(seed: u64) -> EyesSketch {
        let mut s = EyesSketch::new(SIZE, seed, MaskConfig::default()).unwrap();
        s.update(1.0 / 60.0, &Pointer::new(), SIZE);
        s
    }

    fn click(s: &mut EyesSketch, p: Point) {
        let mut pointer = Pointer::new();
        pointer.handle(PointerEvent::Down { x: p.x, y: p.y });
        s.update(1.0 / 60.0, &pointer, SIZE);
    }

    #[test]
    fn arch_keeps_eyes_apart_and_in_top_half() {
        for seed in 0..20 {
            let s = sketch(seed);
            let eyes = s.eyes();
            assert!(eyes.len() >= 3 && eyes.len() <= EYE_COUNT, "seed {seed}: {}", eyes.len());
            for (i, a) in eyes.iter().enumerate() {
                assert!(a.center.y <= SIZE.height / 2.0);
                for b in &eyes[i + 1..] {
                    assert!(a.center.distance(b.center) >= EYEBALL_SIZE * 1.8);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(sketch(6264).eyes(), sketch(6264).eyes());
    }

    #[test]
    fn clicking_reveals_eyes_then_mouth() {
        let mut s = sketch(6264);
        let total = s.eyes().len();
        assert_eq!(s.visible_eyes(), 1);

        for n in 0..total {
            assert!(!s.mouth_shown());
            let target = s.eyes()[n].center;
            click(&mut s, target);
            assert!(s.eyes()[n].clicked);
            assert_eq!(s.visible_eyes(), (n + 2).min(total));
        }
        assert!(s.mouth_shown());
        assert!(s.is_finished());
    }

    #[test]
    fn clicking_a_hidden_eye_does_nothing() {
        let mut s = sketch(6264);
        let hidden = s.eyes()[1].center;
        click(&mut s, hidden);
        assert_eq!(s.visible_eyes(), 1);
        assert!(s.eyes().iter().all(|e| !e.clicked));
    }

    #[test]
    fn iris_stays_mostly_inside_eyeball() {
        let mut s = sketch(3);
        let mut pointer = Pointer::new();
        pointer.handle(PointerEvent::Move { x: 0.0, y: 0.0 });
        s.update(1.0 / 60.0, &pointer, SIZE);
        let eye = &s.eyes()[0];
        let limit = EYEBALL_SIZE / 2.0 - IRIS_SIZE / 4.0;
        assert!((eye.iris.distance(eye.center) - limit).abs() < 1e-9);
    }

    #[test]
    fn reseed_resets_progress() {
        let mut s = sketch(6264);
        let first = s.eyes()[0].center;
        click(&mut s, first);
        s.reseed(11);
        assert_eq!(s.seed(), 11);
        assert_eq!(s.visible_eyes(), 1);
        assert!(s.eyes().iter().all(|e| !e.clicked));
    }

    #[test]
    fn eye_clicks_ignore_the_mask_outline() {
        // Margin shrinks the mask to a 1000 px circle; the arch sits outside it.
        let config = MaskConfig {
            margin: 1500.0,
            ..MaskConfig::default()
        };
        let mut s = EyesSketch::new(SIZE, 6264, config).unwrap();
        s.update(1.0 / 60.0, &Pointer::new(), SIZE);
        let first = s.eyes()[0].center;
        click(&mut s, first);
        assert!(s.eyes()[0].clicked);
        assert_eq!(s.visible_eyes(), 2);
    }

    #[test]
    fn small_first_frame_is_rebuilt_after_resize() {
        let mut s = EyesSketch::new(Size::ZERO, 6264, MaskConfig::default()).unwrap();
        let small = Size::new(300.0, 300.0);
        s.update(1.0 / 60.0, &Pointer::new(), small);
        assert!(s.eyes().is_empty());

        s.update(1.0 / 60.0, &Pointer::new(), SIZE);
        assert_eq!(s.eyes(), sketch(6264).eyes());
        assert_eq!(s.mouth(), sketch(6264).mouth());

        // The whole sequence is reachable on the rebuilt arch.
        for n in 0..s.eyes().len() {
            let target = s.eyes()[n].center;
            click(&mut s, target);
        }
        assert!(s.is_finished());
    }

    #[test]
    fn layout_is_kept_once_an_eye_is_clicked() {
        let mut s = sketch(6264);
        let first = s.eyes()[0].center;
        click(&mut s, first);
        let before = s.eyes().to_vec();

        let larger = Size::new(5000.0, 4500.0);
        s.update(1.0 / 60.0, &Pointer::new(), larger);
        assert_eq!(s.eyes(), &before[..]);
        assert_eq!(s.visible_eyes(), 2);
    }

    #[test]
    fn each_eye_clip_is_balanced() {
        let mut s = sketch(6264);
        let first = s.eyes()[0].center;
        click(&mut s, first);

        let mut surface = RecordingSurface::new(SIZE.width, SIZE.height);
        s.draw(&mut surface);
        // Mask clip plus one clip per open eye.
        let open = s.visible_eyes();
        assert_eq!(surface.count(|op| *op == SurfaceOp::Clip), 1 + open);
        assert_eq!(surface.state_depth(), 0);
    }
}
