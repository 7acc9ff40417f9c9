//! Fly: a fly buzzes around inside the noisy mask.
//!
//! A 200 px tracking square follows the pointer. While the fly is inside
//! it, the fly is reeled toward the canvas center and arrives within two
//! seconds. Clicking the fly catches it and flips the palette to black.

use crate::{Sketch, SketchKind, is_sized, random_point, unit};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use sketch_core::{
    Color, MaskConfig, NoisyEllipseMask, Point, Pointer, Rect, SketchResult, Size, Surface, Vec2,
    noise,
};
use std::f64::consts::TAU;

const FLY_RADIUS: f64 = 25.0;
/// Seconds inside the tracking square to reach the center.
const TRACKING_DURATION: f64 = 2.0;
const FLYING_SPEED: f64 = 200.0;
const NOISE_AMPLITUDE: f64 = 500.0;
const NOISE_SPEED: f64 = 5.5;
const ORGANIC_JITTER: f64 = 10.0;
const WANDER_FORCE: f64 = 1500.0;
const WANDER_CHANGE_INTERVAL: f64 = 3.0;
const VELOCITY_DAMPING: f64 = 0.94;
const BURST_CHANCE: f64 = 0.08;
const TRACKING_SQUARE_SIZE: f64 = 200.0;
const TRACKING_SQUARE_STROKE: f64 = 2.0;

#[derive(Debug, Clone)]
struct Fly {
    position: Point,
    velocity: Vec2,
    visible: bool,
    /// Per-axis noise seeds.
    noise_offset: Vec2,
    noise_time: f64,
    wander_target: Point,
    wander_time: f64,
}

pub struct FlySketch {
    mask: NoisyEllipseMask,
    rng: Pcg32,
    fly: Fly,
    size: Size,
    initialized: bool,
    hovering: bool,
    hover_time: f64,
    tracking_square: Option<Rect>,
    /// Palette flips to black once the fly is caught.
    dark: bool,
}

impl FlySketch {
    pub fn new(size: Size, seed: u64, mask: MaskConfig) -> SketchResult<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let noise_offset = Vec2::new(unit(&mut rng) * 1000.0, unit(&mut rng) * 1000.0);
        Ok(Self {
            mask: NoisyEllipseMask::new(size, mask)?,
            rng,
            fly: Fly {
                position: Point::ZERO,
                velocity: Vec2::ZERO,
                visible: true,
                noise_offset,
                noise_time: 0.0,
                wander_target: Point::ZERO,
                wander_time: 0.0,
            },
            size,
            initialized: false,
            hovering: false,
            hover_time: 0.0,
            tracking_square: None,
            dark: false,
        })
    }

    pub fn fly_position(&self) -> Point {
        self.fly.position
    }

    pub fn is_caught(&self) -> bool {
        !self.fly.visible
    }

    pub fn tracking_square(&self) -> Option<Rect> {
        self.tracking_square
    }

    fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Pull the fly toward the center so it arrives when the hover timer ends.
    fn reel_in(&mut self, dt: f64) {
        if !self.hovering {
            self.hovering = true;
            self.hover_time = 0.0;
        }
        self.hover_time += dt;

        let center = self.center();
        let to_center = center - self.fly.position;
        let distance = to_center.hypot();
        let remaining = TRACKING_DURATION - self.hover_time;

        if distance > 1.0 && remaining > 0.0 {
            let speed = FLYING_SPEED.max(distance / remaining) * dt;
            let step = to_center / distance * speed;

            let t = self.fly.noise_time;
            let off = self.fly.noise_offset;
            let wobble = Vec2::new(noise(t, off.x), noise(t, off.y)) * NOISE_AMPLITUDE * dt;
            self.fly.position += step + wobble;

            let jitter = (distance / 100.0).min(1.0) * ORGANIC_JITTER;
            let shake = Vec2::new(unit(&mut self.rng) - 0.5, unit(&mut self.rng) - 0.5);
            self.fly.position += shake * jitter * dt;
        } else if self.hover_time >= TRACKING_DURATION || distance <= 1.0 {
            self.fly.position = center;
        }
    }

    /// Free flight: wander targets, noise, random bursts, edge bounce.
    fn wander(&mut self, dt: f64) {
        let size = self.size;
        let fly = &mut self.fly;

        fly.wander_time += dt;
        if fly.wander_time >= WANDER_CHANGE_INTERVAL {
            fly.wander_target = random_point(&mut self.rng, size);
            fly.wander_time = 0.0;
        }

        let to_target = fly.wander_target - fly.position;
        let distance = to_target.hypot();
        if distance > 10.0 {
            let strength = WANDER_FORCE * (1.0 - (distance / (size.width * 0.5)).min(1.0));
            fly.velocity += to_target / distance * strength * dt;
        }

        let (t, off) = (fly.noise_time, fly.noise_offset);
        fly.velocity += Vec2::new(noise(t, off.x), noise(t, off.y + 100.0)) * 300.0 * dt;
        let kick = Vec2::new(unit(&mut self.rng) - 0.5, unit(&mut self.rng) - 0.5);
        fly.velocity += kick * 350.0 * dt;
        fly.velocity *= VELOCITY_DAMPING;

        if unit(&mut self.rng) < BURST_CHANCE {
            let angle = unit(&mut self.rng) * TAU;
            let force = 500.0 + unit(&mut self.rng) * 300.0;
            fly.velocity += Vec2::from_angle(angle) * force * dt;
        }

        fly.position += fly.velocity * dt;
        let drift = Vec2::new(
            noise(t * 1.7, off.x + 50.0),
            noise(t * 1.7, off.y + 150.0),
        );
        fly.position += drift * NOISE_AMPLITUDE * dt;

        if fly.position.x < FLY_RADIUS || fly.position.x > size.width - FLY_RADIUS {
            fly.velocity.x *= -0.7;
            fly.position.x = fly.position.x.clamp(FLY_RADIUS, size.width - FLY_RADIUS);
            let push = if fly.position.x < size.width / 2.0 { 1.0 } else { -1.0 };
            fly.velocity.x += push * 200.0 * dt;
        }
        if fly.position.y < FLY_RADIUS || fly.position.y > size.height - FLY_RADIUS {
            fly.velocity.y *= -0.7;
            fly.position.y = fly.position.y.clamp(FLY_RADIUS, size.height - FLY_RADIUS);
            let push = if fly.position.y < size.height / 2.0 { 1.0 } else { -1.0 };
            fly.velocity.y += push * 200.0 * dt;
        }
    }

    /// Background and ink; both flip once the fly is caught.
    fn palette(&self) -> (Color, Color) {
        let (background, ink) = (Color::WHITE, Color::BLACK);
        if self.dark {
            (background.inverted(), ink.inverted())
        } else {
            (background, ink)
        }
    }
}

impl Sketch for FlySketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Fly
    }

    fn update(&mut self, dt: f64, pointer: &Pointer, size: Size) {
        self.size = size;
        self.mask.resize(size);
        self.mask.update(dt);
        self.fly.noise_time += dt * NOISE_SPEED;

        // Too small for the bounce clamp to be well-formed.
        if !is_sized(size) || size.width < 2.0 * FLY_RADIUS || size.height < 2.0 * FLY_RADIUS {
            return;
        }
        if !self.initialized {
            self.fly.position = Point::new(size.width * 0.3, size.height * 0.3);
            self.fly.wander_target = random_point(&mut self.rng, size);
            self.initialized = true;
        }

        self.tracking_square = pointer
            .position()
            .map(|p| Rect::from_center_size(p, (TRACKING_SQUARE_SIZE, TRACKING_SQUARE_SIZE)));

        let in_square = self.fly.visible
            && self
                .tracking_square
                .is_some_and(|square| contains_inclusive(square, self.fly.position));

        if in_square {
            self.reel_in(dt);
        } else {
            self.hovering = false;
            self.hover_time = 0.0;
            if self.fly.visible {
                self.wander(dt);
            }
        }

        if let Some(p) = pointer.position()
            && pointer.just_pressed()
            && self.fly.visible
            && self.mask.contains(p)
            && p.distance(self.fly.position) < FLY_RADIUS
        {
            self.fly.visible = false;
            self.dark = true;
            log::info!("fly caught at ({:.0}, {:.0})", p.x, p.y);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if !self.initialized {
            return;
        }
        let (background, ink) = self.palette();
        let size = self.size;
        self.mask.apply_mask(surface, |s| {
            s.fill_rect(Rect::from_origin_size(Point::ZERO, size), background);
            if let Some(square) = self.tracking_square {
                s.stroke_rect(square, ink, TRACKING_SQUARE_STROKE);
            }
            if self.fly.visible {
                s.fill_circle(self.fly.position, FLY_RADIUS, ink);
            }
        });
    }
}

fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
