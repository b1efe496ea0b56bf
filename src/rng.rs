//! Small deterministic pseudo-random generator.
//!
//! Scene builds take a seed so that node layouts and ring spin axes can be
//! reproduced exactly in tests and headless renders.

/// xorshift32 generator.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Create a generator. A zero seed is remapped since xorshift would stall.
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Next value in `[0, 1]`.
    pub fn next_f32(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state as f32) / (u32::MAX as f32)
    }

    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Centered value in `[-0.5, 0.5]`.
    pub fn centered(&mut self) -> f32 {
        self.next_f32() - 0.5
    }

    /// Uniformly distributed unit vector.
    pub fn unit_vector(&mut self) -> glam::Vec3 {
        let z = self.next_range(-1.0, 1.0);
        let theta = self.next_f32() * std::f32::consts::TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        glam::Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }

    /// Derive an independent generator (for per-ring streams).
    pub fn fork(&mut self) -> Self {
        let seed = (self.next_f32() * u32::MAX as f32) as u32;
        Self::new(seed ^ 0x9e37_79b9)
    }
}
