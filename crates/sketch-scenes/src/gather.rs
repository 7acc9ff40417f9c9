//! Gather: a swarm of springs that settles into three columns.
//!
//! Every instance has a scattered start and a spot inside one of three
//! columns. The closer the pointer is to the canvas center, the further each
//! instance travels toward its column; the blend is a smoothstep on each axis
//! separately. Holding the pointer down collapses the scene and ends it.

use crate::{Sketch, SketchKind, is_sized, random_point, unit};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use sketch_core::{
    Color, Point, Pointer, Rect, SketchResult, Size, Spring, SpringConfig, Surface, Vec2,
};

pub const INSTANCE_COUNT: usize = 900;
const COLUMNS: usize = 3;
const WIGGLE_DISTANCE: f64 = 20.0;
const WIGGLE_SPEED: f64 = 10.0;
/// Instance side as a fraction of the shorter canvas side.
const INSTANCE_SCALE: f64 = 0.055;

const INSTANCE_SPRING: SpringConfig = SpringConfig::new(2.5, 0.05);

const KIND_COLORS: [Color; COLUMNS] = [
    Color::rgba(0.91, 0.30, 0.24, 1.0),
    Color::rgba(0.20, 0.60, 0.86, 1.0),
    Color::rgba(0.95, 0.77, 0.06, 1.0),
];

#[derive(Debug, Clone)]
struct Instance {
    kind: usize,
    start: Point,
    column: Point,
    spring: Spring<Vec2>,
    /// Clamped draw origin.
    origin: Point,
}

/// Column rectangles: 10% of the width each, 80% of the height, separated by
/// 5% gaps and centered as a group.
pub fn column_rects(size: Size) -> [Rect; COLUMNS] {
    let width = size.width * 0.1;
    let height = size.height * 0.8;
    let gap = size.width * 0.05;
    let total = COLUMNS as f64 * width + (COLUMNS - 1) as f64 * gap;
    let x0 = (size.width - total) / 2.0;
    let y0 = size.height / 2.0 - height / 2.0;
    std::array::from_fn(|i| {
        Rect::from_origin_size((x0 + i as f64 * (width + gap), y0), (width, height))
    })
}

/// `1 - smoothstep` of the distance along one axis, normalized by `extent`.
fn axis_blend(distance: f64, extent: f64) -> f64 {
    let t = (distance.abs() / extent).min(1.0);
    1.0 - t * t * (3.0 - 2.0 * t)
}

pub struct GatherSketch {
    seed: u64,
    instances: Vec<Instance>,
    size: Size,
    /// Size the layout was built for.
    laid_out_for: Option<Size>,
    scale: Spring,
    wiggle_time: f64,
    finished: bool,
}

impl GatherSketch {
    pub fn new(seed: u64) -> SketchResult<Self> {
        Ok(Self {
            seed,
            instances: Vec::new(),
            size: Size::ZERO,
            laid_out_for: None,
            scale: Spring::new(1.0, INSTANCE_SPRING)?,
            wiggle_time: 0.0,
            finished: false,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale.position.max(0.0)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Current draw rectangles of every instance.
    pub fn instance_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        let side = self.instance_size();
        self.instances
            .iter()
            .map(move |inst| Rect::from_origin_size(inst.origin, (side, side)))
    }

    fn instance_size(&self) -> f64 {
        self.size.width.min(self.size.height) * INSTANCE_SCALE
    }

    fn lay_out(&mut self, size: Size) -> SketchResult<()> {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let side = size.width.min(size.height) * INSTANCE_SCALE;
        let columns = column_rects(size);
        let per_column = INSTANCE_COUNT / COLUMNS;
        let remainder = INSTANCE_COUNT % COLUMNS;

        let mut instances = Vec::with_capacity(INSTANCE_COUNT);
        for i in 0..INSTANCE_COUNT {
            let start = random_point(&mut rng, size);
            let spring = Spring::new(start.to_vec2(), INSTANCE_SPRING)?;
            instances.push(Instance {
                kind: i % COLUMNS,
                start,
                column: start,
                spring,
                origin: start,
            });
        }

        // Fill columns in order; the first `remainder` take one extra.
        let mut slots = instances.iter_mut();
        for (c, rect) in columns.iter().enumerate() {
            let count = per_column + usize::from(c < remainder);
            let max_y = (rect.y1 - side).max(rect.y0);
            for inst in slots.by_ref().take(count) {
                inst.column = Point::new(
                    rect.x0 + unit(&mut rng) * rect.width(),
                    rect.y0 + unit(&mut rng) * (max_y - rect.y0),
                );
            }
        }

        self.instances = instances;
        self.laid_out_for = Some(size);
        log::debug!(
            "gather laid out {} instances for {}x{}",
            self.instances.len(),
            size.width,
            size.height
        );
        Ok(())
    }
}

impl Sketch for GatherSketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Gather
    }

    fn update(&mut self, dt: f64, pointer: &Pointer, size: Size) {
        self.size = size;
        if !is_sized(size) {
            return;
        }
        if self.laid_out_for.is_none()
            && let Err(err) = self.lay_out(size)
        {
            log::error!("gather layout failed: {err}");
            return;
        }

        self.scale.target = if pointer.is_pressed() { 0.0 } else { 1.0 };
        self.scale.step(dt);
        self.wiggle_time += dt * WIGGLE_SPEED;

        let center = Point::new(size.width / 2.0, size.height / 2.0);
        // Before the first event the pointer sits at the origin.
        let hover = pointer.position().unwrap_or(Point::ZERO);
        let blend_x = axis_blend(hover.x - center.x, size.width);
        let blend_y = axis_blend(hover.y - center.y, size.height);

        let diagonal = size.width.hypot(size.height);
        let side = self.instance_size();
        let wiggle_time = self.wiggle_time;
        for (i, inst) in self.instances.iter_mut().enumerate() {
            let blended = Vec2::new(
                inst.start.x + (inst.column.x - inst.start.x) * blend_x,
                inst.start.y + (inst.column.y - inst.start.y) * blend_y,
            );
            let away = (inst.spring.position - center.to_vec2()).hypot();
            let amplitude = (away / diagonal).min(1.0) * WIGGLE_DISTANCE;
            let phase = wiggle_time + i as f64 * 0.1;
            let wiggle = Vec2::new(phase.sin(), phase.cos()) * amplitude;

            inst.spring.target = blended + wiggle;
            inst.spring.step(dt);
            let p = inst.spring.position;
            inst.origin = Point::new(
                p.x.clamp(0.0, (size.width - side).max(0.0)),
                p.y.clamp(0.0, (size.height - side).max(0.0)),
            );
        }

        if !self.finished && self.scale.position <= 0.0 {
            self.finished = true;
            log::info!("gather collapsed; finished");
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if !is_sized(self.size) || self.laid_out_for.is_none() {
            return;
        }
        surface.fill_rect(Rect::from_origin_size(Point::ZERO, self.size), Color::WHITE);

        let side = self.instance_size() * self.scale();
        if side <= 0.0 {
            return;
        }
        let full = self.instance_size();
        for inst in &self.instances {
            let center = inst.origin + Vec2::new(full / 2.0, full / 2.0);
            let rect = Rect::from_center_size(center, (side, side));
            surface.fill_rect(rect, KIND_COLORS[inst.kind]);
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
