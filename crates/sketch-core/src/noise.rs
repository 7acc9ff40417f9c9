//! Cheap deterministic 1-D noise built from a few sine waves.
//!
//! `noise(time, seed)` sums sines at incommensurate rates with phases derived
//! from `seed`. It is continuous in `time`, stays within `[-1, 1]` because
//! the weights sum to one, and allocates nothing.

use std::f64::consts::TAU;

/// `(time rate, seed rate, weight)` per octave. Weights sum to 1.
const OCTAVES: [(f64, f64, f64); 3] = [(0.5, 1.0, 0.5), (1.3, 1.7, 0.3), (2.1, 2.3, 0.2)];

/// Sample the noise field at `time` for the given `seed`.
#[inline]
pub fn noise(time: f64, seed: f64) -> f64 {
    OCTAVES
        .iter()
        .map(|&(rate, seed_rate, weight)| (time * rate + seed * seed_rate).sin() * weight)
        .sum()
}

/// Per-vertex noise phases for a ring of vertices.
///
/// Vertex `i` of `count` sits at angle `θ = 2π·i/count` and samples noise
/// at the point `(distance·cos θ, distance·sin θ)`. Neighbouring vertices
/// get nearby phases, so the wobble is smooth along the ring, and the ring
/// closes without a seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSeed {
    pub x: f64,
    pub y: f64,
}

impl VertexSeed {
    /// Map a vertex index to its seed.
    pub fn for_vertex(index: usize, count: usize, distance: f64) -> Self {
        let angle = TAU * index as f64 / count.max(1) as f64;
        Self {
            x: angle.cos() * distance,
            y: angle.sin() * distance,
        }
    }

    /// Noise value for this vertex at `time`, within `[-1, 1]`.
    pub fn sample(&self, time: f64) -> f64 {
        // Offset the second axis in time so x and y never cancel in lockstep.
        0.5 * (noise(time, self.x) + noise(time + 17.0, self.y))
    }
}

/// Seed for vertex `index` of a `count`-vertex ring. See [`VertexSeed`].
pub fn vertex_seed(index: usize, count: usize, distance: f64) -> VertexSeed {
    VertexSeed::for_vertex(index, count, distance)
}
