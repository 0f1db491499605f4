//! World sizing, coordinates, seeded randomness, noise, and generation parameters.
#![forbid(unsafe_code)]

mod chunk_coord;
mod gen_ctx;
pub mod noise;
pub mod params;
pub mod rng;

pub use chunk_coord::{ChunkCoord, ChunkSize, LocalPos};
pub use gen_ctx::GenCtx;
pub use noise::NoiseField;
pub use params::{
    CanopyParams, CloudParams, ConfigError, ResourceParams, StreamingParams, TerrainParams,
    TreeParams, TrunkParams, WorldParams, load_params_from_path,
};
pub use rng::WorldRng;
