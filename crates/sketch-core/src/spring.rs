//! Damped spring with a closed-form step.
//!
//! The displacement from the target follows the exact solution of a damped
//! harmonic oscillator:
//!
//! ```text
//! x(t) = e^(-d·t) · (c1·cos(ω·t) + c2·sin(ω·t))
//! d    = ln 2 / half_life        ω  = 2π · frequency
//! c1   = x(0)                    c2 = (v(0) + d·x(0)) / ω
//! ```
//!
//! Because each step evaluates the solution instead of integrating it, the
//! result for a fixed target depends only on the total elapsed time, never on
//! how the time was split into frames, and arbitrarily large steps stay
//! stable. The envelope `e^(-d·t)` halves every `half_life` seconds.

use crate::config::SpringConfig;
use crate::error::SketchResult;
use std::f64::consts::{LN_2, TAU};
use std::ops::{Add, Mul, Sub};

/// Values a [`Spring`] can animate: scalars and vectors alike.
pub trait Animatable:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self>
{
}

impl<T> Animatable for T where T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T> {}

/// A position/velocity pair pulled toward a movable target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring<T = f64> {
    pub position: T,
    pub velocity: T,
    /// Free to change between steps.
    pub target: T,
    config: SpringConfig,
    /// Envelope decay rate, `ln 2 / half_life`.
    damping: f64,
    /// Angular rate, `2π · frequency`.
    omega: f64,
}

fn coefficients(config: SpringConfig) -> (f64, f64) {
    (LN_2 / config.half_life, TAU * config.frequency)
}

impl<T: Animatable> Spring<T> {
    /// Create a spring at rest at `position`, targeting that same position.
    pub fn new(position: T, config: SpringConfig) -> SketchResult<Self> {
        config.validate()?;
        let (damping, omega) = coefficients(config);
        Ok(Self {
            position,
            velocity: position * 0.0,
            target: position,
            config,
            damping,
            omega,
        })
    }

    pub fn with_target(mut self, target: T) -> Self {
        self.target = target;
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Teleport to `value` and stop.
    pub fn snap_to(&mut self, value: T) {
        self.position = value;
        self.target = value;
        self.velocity = value * 0.0;
    }

    /// Current offset from the target.
    pub fn displacement(&self) -> T {
        self.position - self.target
    }

    /// Advance by `dt` seconds toward the current target.
    ///
    /// `dt == 0` (and any non-positive or NaN `dt`) leaves the state untouched.
    pub fn step(&mut self, dt: f64) {
        if !(dt > 0.0) {
            return;
        }
        if dt.is_infinite() {
            self.position = self.target;
            self.velocity = self.target * 0.0;
            return;
        }

        let (d, w) = (self.damping, self.omega);
        let x0 = self.position - self.target;
        let v0 = self.velocity;
        let c2 = (v0 + x0 * d) * (1.0 / w);

        let decay = (-d * dt).exp();
        let (sin, cos) = (w * dt).sin_cos();

        let x = (x0 * cos + c2 * sin) * decay;
        let v = ((c2 * w - x0 * d) * cos - (c2 * d + x0 * w) * sin) * decay;

        self.position = self.target + x;
        self.velocity = v;
    }
}

impl Spring<f64> {
    /// Height of the decay envelope around the target.
    ///
    /// Unlike the raw displacement, which also carries the oscillation
    /// phase, this halves exactly every `half_life` seconds.
    pub fn amplitude(&self) -> f64 {
        let x = self.position - self.target;
        let quadrature = (self.velocity + self.damping * x) / self.omega;
        x.hypot(quadrature)
    }

    pub fn is_settled(&self, epsilon: f64) -> bool {
        (self.position - self.target).abs() <= epsilon && self.velocity.abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SketchError;
    use kurbo::Vec2;

    fn spring(frequency: f64, half_life: f64) -> Spring {
        Spring::new(1.0, SpringConfig::new(frequency, half_life))
            .unwrap()
            .with_target(0.0)
    }

    fn run(spring: &mut Spring, total: f64, steps: usize) {
        let dt = total / steps as f64;
        for _ in 0..steps {
            spring.step(dt);
        }
    }

    #[test]
    fn displacement_halves_after_one_half_life() {
        // frequency · half_life is whole, so the oscillation phase is back at zero
        for (frequency, half_life) in [(10.0, 0.1), (5.0, 0.2), (2.0, 1.0)] {
            let mut s = spring(frequency, half_life);
            run(&mut s, half_life, 1);
            assert!(
                (s.position - 0.5).abs() < 1e-9,
                "f={frequency} h={half_life}: got {}",
                s.position
            );
        }
    }

    #[test]
    fn off_phase_displacement_follows_the_envelope() {
        // 1 Hz, 0.1 s: a tenth of a cycle in, so the envelope has halved but
        // the displacement carries the phase terms on top.
        let (frequency, half_life) = (1.0, 0.1);
        let mut s = spring(frequency, half_life);
        run(&mut s, half_life, 6);
        let (d, w) = (LN_2 / half_life, TAU * frequency);
        let expected = 0.5 * ((w * half_life).cos() + d / w * (w * half_life).sin());
        assert!((s.position - expected).abs() < 1e-9, "got {}", s.position);
        assert!((s.position - 0.7287).abs() < 1e-3);
        assert!((s.amplitude() / spring(frequency, half_life).amplitude() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn result_is_independent_of_step_subdivision() {
        let mut coarse = spring(1.0, 0.1);
        let mut fine = spring(1.0, 0.1);
        let mut uneven = spring(1.0, 0.1);
        run(&mut coarse, 0.1, 1);
        run(&mut fine, 0.1, 600);
        for dt in [0.01, 0.035, 0.005, 0.05] {
            uneven.step(dt);
        }
        assert!((coarse.position - fine.position).abs() < 1e-9);
        assert!((coarse.velocity - fine.velocity).abs() < 1e-7);
        assert!((coarse.position - uneven.position).abs() < 1e-9);
    }

    #[test]
    fn envelope_halves_every_half_life() {
        let mut s = spring(1.0, 0.1);
        let start = s.amplitude();
        run(&mut s, 0.1, 6);
        assert!((s.amplitude() / start - 0.5).abs() < 1e-9);
        run(&mut s, 0.1, 6);
        assert!((s.amplitude() / start - 0.25).abs() < 1e-9);
    }

    #[test]
    fn zero_step_is_a_no_op() {
        let mut s = spring(3.0, 0.2);
        s.step(0.013);
        let before = s;
        s.step(0.0);
        assert_eq!(s, before);
    }

    #[test]
    fn negative_step_is_ignored() {
        let mut s = spring(3.0, 0.2);
        let before = s;
        s.step(-1.0);
        s.step(f64::NAN);
        assert_eq!(s, before);
    }

    #[test]
    fn converges_to_target_from_any_state() {
        let mut s = Spring::new(-40.0, SpringConfig::new(2.5, 0.05))
            .unwrap()
            .with_target(12.0);
        s.velocity = 900.0;
        run(&mut s, 5.0, 300);
        assert!(s.is_settled(1e-9), "pos={} vel={}", s.position, s.velocity);
    }

    #[test]
    fn huge_step_lands_on_target() {
        let mut s = spring(1.0, 0.1);
        s.step(1.0e6);
        assert_eq!(s.position, 0.0);
        assert_eq!(s.velocity, 0.0);
        s.target = 3.0;
        s.step(f64::INFINITY);
        assert_eq!(s.position, 3.0);
    }

    #[test]
    fn oscillates_at_configured_frequency() {
        // With the quadrature term cancelled the displacement is e^(-dt)·cos(ωt),
        // so half a period later the sign has flipped.
        let mut s = spring(2.0, 10.0);
        s.velocity = -LN_2 / 10.0;
        s.step(0.25);
        assert!(s.position < 0.0, "expected overshoot, got {}", s.position);
        s.step(0.25);
        assert!(s.position > 0.0);
    }

    #[test]
    fn rejects_invalid_config() {
        let err = Spring::new(0.0, SpringConfig::new(-1.0, 0.1)).unwrap_err();
        assert!(matches!(err, SketchError::InvalidSpring { field: "frequency", .. }));
        assert!(Spring::new(0.0, SpringConfig::new(1.0, 0.0)).is_err());

        assert_eq!(spring(1.0, 0.1).config(), SpringConfig::new(1.0, 0.1));
    }

    #[test]
    fn vector_spring_tracks_both_axes() {
        let mut s = Spring::new(Vec2::new(0.0, 0.0), SpringConfig::new(2.5, 0.05))
            .unwrap()
            .with_target(Vec2::new(100.0, -50.0));
        for _ in 0..120 {
            s.step(1.0 / 60.0);
        }
        assert!((s.position - Vec2::new(100.0, -50.0)).hypot() < 1e-6);
    }

    #[test]
    fn snap_stops_motion() {
        let mut s = spring(1.0, 0.1);
        s.step(0.05);
        s.snap_to(7.0);
        assert_eq!((s.position, s.velocity, s.target), (7.0, 0.0, 7.0));
    }
}
