//! Chunk grids: generation pipeline, render-instance bookkeeping and occlusion.
#![forbid(unsafe_code)]

mod generation;
mod instances;
mod stage;

pub use instances::InstanceBatch;
pub use stage::{GenStage, StageTimings};

use blockworld_blocks::{Block, BlockType, InstanceHandle};
use blockworld_world::{ChunkCoord, ChunkSize, LocalPos};

const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// One `width x height x width` column of the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    size: ChunkSize,
    blocks: Vec<Block>,
    stage: GenStage,
    timings: StageTimings,
    // Indexed by block id; `None` for non-solid kinds.
    batches: Vec<Option<InstanceBatch>>,
}

impl Chunk {
    /// An ungenerated chunk. Nothing is allocated until the first stage runs.
    pub fn new(coord: ChunkCoord, size: ChunkSize) -> Self {
        Self {
            coord,
            size,
            blocks: Vec::new(),
            stage: GenStage::Ungenerated,
            timings: StageTimings::default(),
            batches: Vec::new(),
        }
    }

    /// Builds a loaded chunk from an explicit grid of kinds laid out by [`Chunk::idx`].
    pub fn from_kinds(coord: ChunkCoord, size: ChunkSize, kinds: &[BlockType]) -> Self {
        let mut chunk = Chunk::new(coord, size);
        chunk.initialize();
        for (cell, kind) in chunk.blocks.iter_mut().zip(kinds.iter()) {
            *cell = Block::of(*kind);
        }
        chunk.stage = GenStage::PlayerEditsApplied;
        chunk.build_instances();
        chunk
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn size(&self) -> ChunkSize {
        self.size
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        self.size.origin(self.coord)
    }

    #[inline]
    pub fn stage(&self) -> GenStage {
        self.stage
    }

    /// True once the instance build has finished.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.stage == GenStage::Meshed
    }

    #[inline]
    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        let w = self.size.width;
        (y * w + z) * w + x
    }

    fn local(&self, x: i32, y: i32, z: i32) -> Option<LocalPos> {
        if self.size.in_bounds(x, y, z) {
            Some(LocalPos::new(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Cell at a local position; `None` outside the chunk or before initialization.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let p = self.local(x, y, z)?;
        self.blocks.get(self.idx(p.x, p.y, p.z)).copied()
    }

    #[inline]
    pub fn kind_at(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.get(x, y, z).map(|b| b.kind)
    }

    /// Out-of-chunk cells count as empty.
    #[inline]
    pub fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some_and(|b| b.is_solid())
    }

    /// True when all six face neighbors are solid.
    pub fn is_obscured(&self, x: i32, y: i32, z: i32) -> bool {
        NEIGHBORS
            .iter()
            .all(|(dx, dy, dz)| self.is_solid_at(x + dx, y + dy, z + dz))
    }

    /// Block kinds in index order.
    pub fn kinds(&self) -> Vec<BlockType> {
        self.blocks.iter().map(|b| b.kind).collect()
    }

    pub(crate) fn set_kind(&mut self, p: LocalPos, kind: BlockType) {
        let i = self.idx(p.x, p.y, p.z);
        self.blocks[i] = Block::of(kind);
    }

    pub(crate) fn kind_local(&self, p: LocalPos) -> BlockType {
        self.blocks[self.idx(p.x, p.y, p.z)].kind
    }

    pub fn batch(&self, kind: BlockType) -> Option<&InstanceBatch> {
        self.batches.get(kind.id() as usize).and_then(|b| b.as_ref())
    }

    pub fn batches(&self) -> impl Iterator<Item = &InstanceBatch> {
        self.batches.iter().flatten()
    }

    /// Number of rendered cells across every batch.
    pub fn instance_count(&self) -> usize {
        self.batches().map(|b| b.len()).sum()
    }

    pub(crate) fn reset_batches(&mut self) {
        let capacity = self.size.volume();
        self.batches = BlockType::ALL
            .iter()
            .map(|k| k.is_solid().then(|| InstanceBatch::new(*k, capacity)))
            .collect();
    }

    fn attach_instance(&mut self, p: LocalPos) -> bool {
        let i = self.idx(p.x, p.y, p.z);
        let block = self.blocks[i];
        if !block.is_solid() || block.instance.is_some() {
            return false;
        }
        let Some(batch) = self
            .batches
            .get_mut(block.kind.id() as usize)
            .and_then(|b| b.as_mut())
        else {
            return false;
        };
        match batch.push(p) {
            Some(handle) => {
                self.blocks[i].instance = Some(handle);
                true
            }
            None => {
                log::warn!(target: "gen", "instance batch for {} full in chunk {:?}", block.kind.name(), self.coord);
                false
            }
        }
    }

    fn detach_instance(&mut self, p: LocalPos) -> bool {
        let i = self.idx(p.x, p.y, p.z);
        let block = self.blocks[i];
        let Some(handle) = block.instance else {
            return false;
        };
        self.blocks[i].instance = None;
        let moved = self
            .batches
            .get_mut(block.kind.id() as usize)
            .and_then(|b| b.as_mut())
            .and_then(|batch| batch.swap_remove(handle));
        if let Some(m) = moved {
            let j = self.idx(m.x, m.y, m.z);
            self.blocks[j].instance = Some(handle);
        }
        true
    }

    fn neighbors_of(&self, p: LocalPos) -> impl Iterator<Item = LocalPos> + '_ {
        NEIGHBORS.iter().filter_map(move |(dx, dy, dz)| {
            self.local(p.x as i32 + dx, p.y as i32 + dy, p.z as i32 + dz)
        })
    }

    /// Places a solid block into an empty cell. Neighbors buried by it lose their instance.
    /// Returns `false` (and changes nothing) if the cell is outside the chunk, occupied,
    /// or `kind` is not solid.
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, kind: BlockType) -> bool {
        if !kind.is_solid() || self.blocks.is_empty() {
            return false;
        }
        let Some(p) = self.local(x, y, z) else {
            return false;
        };
        if self.kind_local(p) != BlockType::Empty {
            return false;
        }
        self.set_kind(p, kind);
        if !self.is_obscured(x, y, z) {
            self.attach_instance(p);
        }
        let neighbors: Vec<LocalPos> = self.neighbors_of(p).collect();
        for n in neighbors {
            if self.is_obscured(n.x as i32, n.y as i32, n.z as i32) {
                self.detach_instance(n);
            }
        }
        true
    }

    /// Clears a solid cell. Neighbors it exposed gain an instance.
    /// Returns the removed kind, or `None` if the cell was not solid.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        let p = self.local(x, y, z)?;
        let kind = self.blocks.get(self.idx(p.x, p.y, p.z))?.kind;
        if !kind.is_solid() {
            return None;
        }
        self.detach_instance(p);
        self.set_kind(p, BlockType::Empty);
        let neighbors: Vec<LocalPos> = self.neighbors_of(p).collect();
        for n in neighbors {
            self.attach_instance(n);
        }
        Some(kind)
    }

    /// Releases every render instance. The block grid is kept.
    pub fn dispose_instances(&mut self) {
        for b in self.batches.iter_mut().flatten() {
            b.clear();
        }
        for cell in &mut self.blocks {
            cell.instance = None;
        }
    }

    /// Topmost solid `y` of a local column, if any.
    pub fn top_solid(&self, x: i32, z: i32) -> Option<usize> {
        (0..self.size.height as i32)
            .rev()
            .find(|&y| self.is_solid_at(x, y, z))
            .map(|y| y as usize)
    }

    /// Topmost solid `y` of a local column that a body can stand on. Cloud cells are
    /// skipped.
    pub fn top_ground(&self, x: i32, z: i32) -> Option<usize> {
        (0..self.size.height as i32)
            .rev()
            .find(|&y| {
                self.kind_at(x, y, z)
                    .is_some_and(|k| k.is_solid() && k != BlockType::Cloud)
            })
            .map(|y| y as usize)
    }

    /// Checks the render-instance invariant: a cell has an instance exactly when it is
    /// solid and not obscured, and every batch slot points back at its cell.
    pub fn instances_consistent(&self) -> bool {
        let w = self.size.width;
        let h = self.size.height;
        for y in 0..h {
            for z in 0..w {
                for x in 0..w {
                    let b = self.blocks[self.idx(x, y, z)];
                    let visible = b.is_solid() && !self.is_obscured(x as i32, y as i32, z as i32);
                    if visible != b.instance.is_some() {
                        return false;
                    }
                }
            }
        }
        self.batches().all(|batch| {
            batch.cells().iter().enumerate().all(|(slot, p)| {
                let b = self.blocks[self.idx(p.x, p.y, p.z)];
                b.kind == batch.kind() && b.instance == Some(InstanceHandle(slot as u32))
            })
        })
    }
}
