use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ChunkCoord;

/// Seeded pseudo-random stream. Two streams built from the same seed yield the same
/// sequence; there is no rewind, only reconstruction.
#[derive(Clone, Debug)]
pub struct WorldRng {
    inner: ChaCha8Rng,
}

impl WorldRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Independent stream for per-chunk placement decisions (trees).
    pub fn for_chunk(seed: u64, coord: ChunkCoord) -> Self {
        let mixed = seed
            ^ (coord.cx as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (coord.cz as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        Self::new(mixed)
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }

    /// Seed for a derived generator (noise fields).
    #[inline]
    pub fn next_seed(&mut self) -> i32 {
        self.inner.r#gen::<i32>()
    }
}
