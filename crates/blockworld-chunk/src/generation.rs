use std::time::Instant;

use blockworld_blocks::{Block, BlockType};
use blockworld_edit::ChangeStore;
use blockworld_world::{GenCtx, LocalPos};

use crate::{Chunk, GenStage};

impl Chunk {
    /// Runs the whole pipeline from scratch. Re-running with the same context and edits
    /// reproduces the same grid.
    pub fn generate(&mut self, ctx: &GenCtx, edits: &ChangeStore) {
        let start = Instant::now();
        self.initialize();
        self.place_resources(ctx);
        self.shape_surface(ctx);
        self.place_decorations(ctx);
        self.apply_edits(edits);
        self.build_instances();
        log::debug!(
            target: "gen",
            "chunk ({}, {}) generated in {}us: {}",
            self.coord.cx,
            self.coord.cz,
            start.elapsed().as_micros(),
            self.timings
        );
    }

    fn finish_stage(&mut self, stage: GenStage, start: Instant) {
        self.timings.record_stage_duration(stage, start.elapsed());
        self.stage = stage;
    }

    /// Allocates the grid with every cell empty and drops any previous instances.
    pub fn initialize(&mut self) {
        let start = Instant::now();
        self.timings = Default::default();
        self.blocks.clear();
        self.blocks.resize(self.size.volume(), Block::EMPTY);
        self.reset_batches();
        self.finish_stage(GenStage::TerrainInitialized, start);
    }

    pub fn place_resources(&mut self, ctx: &GenCtx) {
        let start = Instant::now();
        let (ox, oz) = self.origin();
        let (w, h) = (self.size.width, self.size.height);
        for res in &ctx.params.resources {
            for x in 0..w {
                for z in 0..w {
                    for y in 0..h {
                        let v = ctx.resource_value(res.scale, ox + x as i32, y as i32, oz + z as i32);
                        if v > res.scarcity {
                            self.set_kind(LocalPos::new(x, y, z), res.kind);
                        }
                    }
                }
            }
        }
        self.finish_stage(GenStage::ResourcesPlaced, start);
    }

    pub fn shape_surface(&mut self, ctx: &GenCtx) {
        let start = Instant::now();
        let (w, h) = (self.size.width, self.size.height);
        let water = ctx.params.terrain.water_offset;
        for x in 0..w {
            for z in 0..w {
                let top = self.surface_height_local(ctx, x as i32, z as i32) as i32;
                for y in 0..h as i32 {
                    let p = LocalPos::new(x, y as usize, z);
                    if y <= water && y <= top {
                        self.set_kind(p, BlockType::Sand);
                    } else if y < top {
                        if self.kind_local(p) == BlockType::Empty {
                            self.set_kind(p, BlockType::Dirt);
                        }
                    } else if y == top {
                        self.set_kind(p, BlockType::Grass);
                    } else {
                        self.set_kind(p, BlockType::Empty);
                    }
                }
            }
        }
        self.finish_stage(GenStage::SurfaceShaped, start);
    }

    /// Trees, then clouds.
    pub fn place_decorations(&mut self, ctx: &GenCtx) {
        let start = Instant::now();
        self.place_trees(ctx);
        self.place_clouds(ctx);
        self.finish_stage(GenStage::DecorationsPlaced, start);
    }

    fn place_trees(&mut self, ctx: &GenCtx) {
        let trees = &ctx.params.trees;
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        let border = trees.canopy.max_radius.max(0);
        let mut rng = ctx.decoration_rng(self.coord);
        for x in border..w - border {
            for z in border..w - border {
                if rng.random() >= f64::from(trees.frequency) {
                    continue;
                }
                let Some(ground) = (0..h)
                    .rev()
                    .find(|&y| self.kind_at(x, y, z) == Some(BlockType::Grass))
                else {
                    continue;
                };
                let span = f64::from(trees.trunk.max_height - trees.trunk.min_height);
                let trunk = (f64::from(trees.trunk.min_height) + span * rng.random()).round() as i32;
                for y in ground + 1..=ground + trunk {
                    if let Some(p) = self.local(x, y, z) {
                        self.set_kind(p, BlockType::Tree);
                    }
                }

                let span = f64::from(trees.canopy.max_radius - trees.canopy.min_radius);
                let r = (f64::from(trees.canopy.min_radius) + span * rng.random()).round() as i32;
                let cy = ground + trunk + 1;
                for dx in -r..=r {
                    for dy in -r..=r {
                        for dz in -r..=r {
                            let roll = rng.random();
                            if dx * dx + dy * dy + dz * dz > r * r {
                                continue;
                            }
                            let Some(p) = self.local(x + dx, cy + dy, z + dz) else {
                                continue;
                            };
                            if self.kind_local(p) == BlockType::Empty
                                && roll < f64::from(trees.canopy.density)
                            {
                                self.set_kind(p, BlockType::Leaves);
                            }
                        }
                    }
                }
            }
        }
    }

    fn place_clouds(&mut self, ctx: &GenCtx) {
        let (ox, oz) = self.origin();
        let (w, h) = (self.size.width, self.size.height);
        let density = ctx.params.clouds.density;
        for x in 0..w {
            for z in 0..w {
                if ctx.cloud_value(ox + x as i32, oz + z as i32) < density {
                    self.set_kind(LocalPos::new(x, h - 1, z), BlockType::Cloud);
                }
            }
        }
    }

    /// Overwrites generated cells with stored player edits for this chunk's origin.
    pub fn apply_edits(&mut self, edits: &ChangeStore) {
        let start = Instant::now();
        let (ox, oz) = self.origin();
        let mut applied = 0usize;
        for ((x, y, z), kind) in edits.chunk_edits(ox, oz) {
            if let Some(p) = self.local(x, y, z) {
                self.set_kind(p, kind);
                applied += 1;
            }
        }
        if applied > 0 {
            log::trace!(target: "gen", "chunk ({}, {}): {} edits applied", self.coord.cx, self.coord.cz, applied);
        }
        self.finish_stage(GenStage::PlayerEditsApplied, start);
    }

    /// Gives every solid, non-obscured cell a render instance and marks the chunk loaded.
    pub fn build_instances(&mut self) {
        let start = Instant::now();
        self.reset_batches();
        for cell in &mut self.blocks {
            cell.instance = None;
        }
        let (w, h) = (self.size.width, self.size.height);
        for y in 0..h {
            for z in 0..w {
                for x in 0..w {
                    let (xi, yi, zi) = (x as i32, y as i32, z as i32);
                    if self.is_solid_at(xi, yi, zi) && !self.is_obscured(xi, yi, zi) {
                        self.attach_instance(LocalPos::new(x, y, z));
                    }
                }
            }
        }
        self.finish_stage(GenStage::Meshed, start);
    }

    /// Terrain surface height of a column addressed relative to this chunk's origin.
    /// `x`/`z` may lie outside `[0, width)`; the sample is taken at the absolute position.
    #[inline]
    pub fn surface_height_local(&self, ctx: &GenCtx, x: i32, z: i32) -> usize {
        let (ox, oz) = self.origin();
        ctx.surface_height(ox + x, oz + z)
    }
}
