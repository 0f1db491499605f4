use std::sync::Arc;

use crate::{ChunkCoord, ChunkSize, NoiseField, WorldParams, WorldRng};

/// Noise fields and parameters shared by every chunk generated from one parameter set.
///
/// The fields are drawn from a single seeded stream in a fixed order, so two contexts
/// built from equal parameters sample identically.
pub struct GenCtx {
    pub params: Arc<WorldParams>,
    pub size: ChunkSize,
    pub resources: NoiseField,
    pub terrain: NoiseField,
    pub clouds: NoiseField,
}

impl GenCtx {
    pub fn new(params: Arc<WorldParams>) -> Self {
        let mut rng = WorldRng::new(u64::from(params.seed));
        let resources = NoiseField::from_rng(&mut rng);
        let terrain = NoiseField::from_rng(&mut rng);
        let clouds = NoiseField::from_rng(&mut rng);
        Self {
            size: params.chunk_size(),
            params,
            resources,
            terrain,
            clouds,
        }
    }

    /// Surface height of the world column `(wx, wz)`, clamped to `[0, height - 1]`.
    pub fn surface_height(&self, wx: i32, wz: i32) -> usize {
        let t = &self.params.terrain;
        let value = self.terrain.sample_2d(wx as f32 / t.scale, wz as f32 / t.scale);
        let scaled = t.offset + t.magnitude * value;
        let h = (self.size.height as f32 * scaled).floor() as i32;
        h.clamp(0, self.size.height as i32 - 1) as usize
    }

    /// Resource noise at an absolute block position, scaled per axis.
    #[inline]
    pub fn resource_value(&self, scale: [f32; 3], wx: i32, wy: i32, wz: i32) -> f32 {
        self.resources.sample_3d(
            wx as f32 / scale[0],
            wy as f32 / scale[1],
            wz as f32 / scale[2],
        )
    }

    /// Cloud noise remapped to `[0, 1]`.
    #[inline]
    pub fn cloud_value(&self, wx: i32, wz: i32) -> f32 {
        let s = self.params.clouds.scale;
        (self.clouds.sample_2d(wx as f32 / s, wz as f32 / s) + 1.0) * 0.5
    }

    /// Placement stream for decorations inside one chunk.
    #[inline]
    pub fn decoration_rng(&self, coord: ChunkCoord) -> WorldRng {
        WorldRng::for_chunk(u64::from(self.params.seed), coord)
    }
}
