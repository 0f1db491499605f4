use std::fs;
use std::path::Path;

use blockworld_blocks::BlockType;
use serde::{Deserialize, Serialize};

use crate::ChunkSize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading world config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing world config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Every tunable of a world. Changing any of them means regenerating the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldParams {
    #[serde(default)]
    pub seed: u32,
    #[serde(default)]
    pub terrain: TerrainParams,
    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceParams>,
    #[serde(default)]
    pub trees: TreeParams,
    #[serde(default)]
    pub clouds: CloudParams,
    #[serde(default)]
    pub streaming: StreamingParams,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            seed: 0,
            terrain: TerrainParams::default(),
            resources: default_resources(),
            trees: TreeParams::default(),
            clouds: CloudParams::default(),
            streaming: StreamingParams::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    #[serde(default = "default_terrain_scale")]
    pub scale: f32,
    #[serde(default = "default_terrain_magnitude")]
    pub magnitude: f32,
    #[serde(default = "default_terrain_offset")]
    pub offset: f32,
    #[serde(default = "default_water_offset")]
    pub water_offset: i32,
}
fn default_terrain_scale() -> f32 {
    30.0
}
fn default_terrain_magnitude() -> f32 {
    0.3
}
fn default_terrain_offset() -> f32 {
    0.4
}
fn default_water_offset() -> i32 {
    4
}
impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            scale: default_terrain_scale(),
            magnitude: default_terrain_magnitude(),
            offset: default_terrain_offset(),
            water_offset: default_water_offset(),
        }
    }
}

/// Ore/stone veins: a 3D noise sample above `scarcity` places `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceParams {
    pub kind: BlockType,
    pub scale: [f32; 3],
    pub scarcity: f32,
}

fn default_resources() -> Vec<ResourceParams> {
    vec![
        ResourceParams {
            kind: BlockType::Stone,
            scale: [30.0, 30.0, 30.0],
            scarcity: 0.8,
        },
        ResourceParams {
            kind: BlockType::CoalOre,
            scale: [20.0, 20.0, 20.0],
            scarcity: 0.8,
        },
        ResourceParams {
            kind: BlockType::IronOre,
            scale: [40.0, 40.0, 40.0],
            scarcity: 0.9,
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    #[serde(default = "default_tree_frequency")]
    pub frequency: f32,
    #[serde(default)]
    pub trunk: TrunkParams,
    #[serde(default)]
    pub canopy: CanopyParams,
}
fn default_tree_frequency() -> f32 {
    0.01
}
impl Default for TreeParams {
    fn default() -> Self {
        Self {
            frequency: default_tree_frequency(),
            trunk: TrunkParams::default(),
            canopy: CanopyParams::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrunkParams {
    pub min_height: i32,
    pub max_height: i32,
}
impl Default for TrunkParams {
    fn default() -> Self {
        Self {
            min_height: 4,
            max_height: 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanopyParams {
    pub min_radius: i32,
    pub max_radius: i32,
    pub density: f32,
}
impl Default for CanopyParams {
    fn default() -> Self {
        Self {
            min_radius: 2,
            max_radius: 3,
            density: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CloudParams {
    #[serde(default = "default_cloud_scale")]
    pub scale: f32,
    #[serde(default = "default_cloud_density")]
    pub density: f32,
}
fn default_cloud_scale() -> f32 {
    30.0
}
fn default_cloud_density() -> f32 {
    0.3
}
impl Default for CloudParams {
    fn default() -> Self {
        Self {
            scale: default_cloud_scale(),
            density: default_cloud_density(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamingParams {
    #[serde(default = "default_draw_distance")]
    pub draw_distance: i32,
    #[serde(default = "default_chunk_width")]
    pub chunk_width: usize,
    #[serde(default = "default_chunk_height")]
    pub chunk_height: usize,
    #[serde(default = "default_async_loading")]
    pub async_loading: bool,
    /// Chunks generated per idle slot when loading asynchronously.
    #[serde(default = "default_idle_budget")]
    pub idle_budget: usize,
    /// Ticks a queued chunk may wait before it is generated regardless of budget.
    #[serde(default = "default_idle_timeout_ticks")]
    pub idle_timeout_ticks: u64,
}
fn default_draw_distance() -> i32 {
    2
}
fn default_chunk_width() -> usize {
    32
}
fn default_chunk_height() -> usize {
    32
}
fn default_async_loading() -> bool {
    true
}
fn default_idle_budget() -> usize {
    2
}
fn default_idle_timeout_ticks() -> u64 {
    4
}
impl Default for StreamingParams {
    fn default() -> Self {
        Self {
            draw_distance: default_draw_distance(),
            chunk_width: default_chunk_width(),
            chunk_height: default_chunk_height(),
            async_loading: default_async_loading(),
            idle_budget: default_idle_budget(),
            idle_timeout_ticks: default_idle_timeout_ticks(),
        }
    }
}

fn clamp_f32(name: &str, v: f32, lo: f32, hi: f32) -> f32 {
    let c = if v.is_nan() { lo } else { v.clamp(lo, hi) };
    if c != v {
        log::warn!(target: "config", "{} = {} outside [{}, {}]; using {}", name, v, lo, hi, c);
    }
    c
}

fn clamp_int<T>(name: &str, v: T, lo: T, hi: T) -> T
where
    T: Ord + Copy + std::fmt::Display,
{
    let c = v.clamp(lo, hi);
    if c != v {
        log::warn!(target: "config", "{} = {} outside [{}, {}]; using {}", name, v, lo, hi, c);
    }
    c
}

impl WorldParams {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let params: WorldParams = toml::from_str(s)?;
        Ok(params.sanitized())
    }

    #[inline]
    pub fn chunk_size(&self) -> ChunkSize {
        ChunkSize::new(self.streaming.chunk_width, self.streaming.chunk_height)
    }

    /// Height of the water plane a renderer draws over sand-level terrain.
    #[inline]
    pub fn water_level(&self) -> f32 {
        self.terrain.water_offset as f32 + 0.4
    }

    /// Copy with every tunable clamped into its supported range.
    pub fn sanitized(mut self) -> Self {
        let s = &mut self.streaming;
        s.chunk_width = clamp_int("streaming.chunk_width", s.chunk_width, 1, 128);
        s.chunk_height = clamp_int("streaming.chunk_height", s.chunk_height, 1, 256);
        s.draw_distance = clamp_int("streaming.draw_distance", s.draw_distance, 0, 8);
        s.idle_budget = clamp_int("streaming.idle_budget", s.idle_budget, 1, 64);
        let height = s.chunk_height as i32;

        let t = &mut self.terrain;
        t.scale = clamp_f32("terrain.scale", t.scale, 10.0, 100.0);
        t.magnitude = clamp_f32("terrain.magnitude", t.magnitude, 0.0, 1.0);
        t.offset = clamp_f32("terrain.offset", t.offset, 0.0, 1.0);
        t.water_offset = clamp_int("terrain.water_offset", t.water_offset, 0, height - 1);

        for r in &mut self.resources {
            let name = r.kind.name();
            for (axis, v) in ["x", "y", "z"].iter().zip(r.scale.iter_mut()) {
                *v = clamp_f32(&format!("resources.{name}.scale.{axis}"), *v, 1.0, 100.0);
            }
            r.scarcity = clamp_f32(&format!("resources.{name}.scarcity"), r.scarcity, 0.0, 1.0);
        }

        let tr = &mut self.trees;
        tr.frequency = clamp_f32("trees.frequency", tr.frequency, 0.0, 1.0);
        tr.trunk.min_height = clamp_int("trees.trunk.min_height", tr.trunk.min_height, 0, height);
        tr.trunk.max_height = clamp_int("trees.trunk.max_height", tr.trunk.max_height, 0, height);
        if tr.trunk.min_height > tr.trunk.max_height {
            std::mem::swap(&mut tr.trunk.min_height, &mut tr.trunk.max_height);
        }
        tr.canopy.min_radius = clamp_int("trees.canopy.min_radius", tr.canopy.min_radius, 0, 16);
        tr.canopy.max_radius = clamp_int("trees.canopy.max_radius", tr.canopy.max_radius, 0, 16);
        if tr.canopy.min_radius > tr.canopy.max_radius {
            std::mem::swap(&mut tr.canopy.min_radius, &mut tr.canopy.max_radius);
        }
        tr.canopy.density = clamp_f32("trees.canopy.density", tr.canopy.density, 0.0, 1.0);

        let c = &mut self.clouds;
        c.scale = clamp_f32("clouds.scale", c.scale, 1.0, 100.0);
        c.density = clamp_f32("clouds.density", c.density, 0.0, 1.0);
        self
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldParams, ConfigError> {
    let s = fs::read_to_string(path)?;
    WorldParams::from_toml_str(&s)
}
