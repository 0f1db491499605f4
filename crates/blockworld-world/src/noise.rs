use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::WorldRng;

/// Coherent noise sampler seeded from a [`WorldRng`]. Inputs are absolute,
/// already-scaled world coordinates; outputs lie in `[-1, 1]`.
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn from_rng(rng: &mut WorldRng) -> Self {
        let mut noise = FastNoiseLite::with_seed(rng.next_seed());
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Callers divide by their own scale, so sample at unit frequency.
        noise.set_frequency(Some(1.0));
        Self { noise }
    }

    #[inline]
    pub fn sample_2d(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z).clamp(-1.0, 1.0)
    }

    #[inline]
    pub fn sample_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.get_noise_3d(x, y, z).clamp(-1.0, 1.0)
    }
}
