use std::collections::VecDeque;
use std::sync::Arc;

use blockworld_blocks::{Block, BlockType};
use blockworld_chunk::Chunk;
use blockworld_edit::{ChangeEntry, ChangeStore};
use blockworld_geom::{Vec3, block_coord};
use blockworld_world::{ChunkCoord, ChunkSize, GenCtx, WorldParams};
use hashbrown::HashMap;

use crate::{GenQueue, GenTask, WorldEvent};

/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Everything needed to rebuild a world: its parameters and the player's edits.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub params: WorldParams,
    pub changes: Vec<ChangeEntry>,
}

struct ChunkSlot {
    chunk: Chunk,
    epoch: u64,
}

/// Owns the streamed chunks and the change store, and forwards block queries and edits.
pub struct WorldManager {
    params: Arc<WorldParams>,
    ctx: GenCtx,
    store: ChangeStore,
    chunks: HashMap<ChunkCoord, ChunkSlot>,
    queue: GenQueue,
    next_epoch: u64,
    observer: Option<Vec3>,
    events: VecDeque<WorldEvent>,
}

impl WorldManager {
    pub fn new(params: WorldParams) -> Self {
        let params = Arc::new(params.sanitized());
        Self {
            ctx: GenCtx::new(Arc::clone(&params)),
            params,
            store: ChangeStore::new(),
            chunks: HashMap::new(),
            queue: GenQueue::new(),
            next_epoch: 1,
            observer: None,
            events: VecDeque::new(),
        }
    }

    #[inline]
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    #[inline]
    pub fn chunk_size(&self) -> ChunkSize {
        self.ctx.size
    }

    #[inline]
    pub fn change_store(&self) -> &ChangeStore {
        &self.store
    }

    /// Generation tasks still waiting in the queue (stale ones included).
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).map(|s| &s.chunk)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunk(coord).is_some_and(|c| c.is_loaded())
    }

    /// Every streamed chunk coordinate, loaded or still queued, sorted.
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        v.sort();
        v
    }

    /// Coordinates of chunks that finished generating, sorted.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, s)| s.chunk.is_loaded())
            .map(|(c, _)| *c)
            .collect();
        v.sort();
        v
    }

    /// Takes the queued world events, oldest first. Hosts should drain every frame; past
    /// `MAX_PENDING_EVENTS` the oldest events are discarded.
    pub fn drain_events(&mut self) -> impl Iterator<Item = WorldEvent> + '_ {
        self.events.drain(..)
    }

    fn emit(&mut self, event: WorldEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
            log::debug!(target: "stream", "event outbox full, dropping oldest");
        }
        self.events.push_back(event);
    }

    fn loaded_chunk_at(&self, wx: i32, wy: i32, wz: i32) -> Option<(&Chunk, (i32, i32, i32))> {
        let (coord, local) = self.ctx.size.world_to_chunk(wx, wy, wz)?;
        let chunk = self.chunk(coord).filter(|c| c.is_loaded())?;
        Some((chunk, (local.x as i32, local.y as i32, local.z as i32)))
    }

    /// Block at a world position. `None` when the position is outside the world's
    /// height or its chunk is absent or still generating.
    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        let (chunk, (x, y, z)) = self.loaded_chunk_at(wx, wy, wz)?;
        chunk.get(x, y, z)
    }

    /// Places `kind` into an empty cell of a loaded chunk and records the edit.
    pub fn add_block(&mut self, wx: i32, wy: i32, wz: i32, kind: BlockType) -> bool {
        let Some((coord, local)) = self.ctx.size.world_to_chunk(wx, wy, wz) else {
            return false;
        };
        let (x, y, z) = (local.x as i32, local.y as i32, local.z as i32);
        let Some(slot) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if !slot.chunk.is_loaded() || !slot.chunk.add_block(x, y, z, kind) {
            return false;
        }
        let (ox, oz) = slot.chunk.origin();
        self.store.set(ox, oz, x, y, z, kind);
        log::debug!(target: "edit", "added {} at ({}, {}, {})", kind.name(), wx, wy, wz);
        self.emit(WorldEvent::BlockAdded {
            x: wx,
            y: wy,
            z: wz,
            kind,
        });
        true
    }

    /// Clears a solid cell of a loaded chunk and records the edit.
    pub fn remove_block(&mut self, wx: i32, wy: i32, wz: i32) -> bool {
        let Some((coord, local)) = self.ctx.size.world_to_chunk(wx, wy, wz) else {
            return false;
        };
        let (x, y, z) = (local.x as i32, local.y as i32, local.z as i32);
        let Some(slot) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if !slot.chunk.is_loaded() {
            return false;
        }
        let Some(kind) = slot.chunk.remove_block(x, y, z) else {
            return false;
        };
        let (ox, oz) = slot.chunk.origin();
        self.store.set(ox, oz, x, y, z, BlockType::Empty);
        log::debug!(target: "edit", "removed {} at ({}, {}, {})", kind.name(), wx, wy, wz);
        self.emit(WorldEvent::BlockRemoved {
            x: wx,
            y: wy,
            z: wz,
            kind,
        });
        true
    }

    /// Topmost standable block y of a world column (clouds skipped), if its chunk is
    /// loaded.
    pub fn surface_height(&self, wx: i32, wz: i32) -> Option<i32> {
        let (chunk, (x, _, z)) = self.loaded_chunk_at(wx, 0, wz)?;
        chunk.top_ground(x, z).map(|y| y as i32)
    }

    /// Makes the streamed set exactly the chunks within draw distance of `observer`'s chunk.
    pub fn update(&mut self, observer: Vec3) {
        self.observer = Some(observer);
        let center = self
            .ctx
            .size
            .chunk_of(block_coord(observer.x), block_coord(observer.z));
        let radius = self.params.streaming.draw_distance;

        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|c| c.chebyshev(center) > radius)
            .collect();
        for coord in &stale {
            self.evict(*coord);
        }

        let mut added = 0usize;
        for coord in center.square_around(radius) {
            if !self.chunks.contains_key(&coord) {
                self.create(coord);
                added += 1;
            }
        }
        if added > 0 || !stale.is_empty() {
            log::debug!(
                target: "stream",
                "center ({}, {}): +{} -{} chunks, {} queued",
                center.cx,
                center.cz,
                added,
                stale.len(),
                self.queue.len()
            );
        }
    }

    fn evict(&mut self, coord: ChunkCoord) {
        if let Some(mut slot) = self.chunks.remove(&coord) {
            slot.chunk.dispose_instances();
            log::trace!(target: "stream", "evicted chunk ({}, {})", coord.cx, coord.cz);
            self.emit(WorldEvent::ChunkUnloaded { coord });
        }
    }

    fn create(&mut self, coord: ChunkCoord) {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        let chunk = Chunk::new(coord, self.ctx.size);
        self.chunks.insert(coord, ChunkSlot { chunk, epoch });
        let task = GenTask { coord, epoch };
        let streaming = &self.params.streaming;
        if streaming.async_loading {
            self.queue.schedule_after(streaming.idle_timeout_ticks, task);
        } else {
            self.run_task(task);
        }
    }

    /// Generates the task's chunk unless the task is stale. Returns whether it ran.
    fn run_task(&mut self, task: GenTask) -> bool {
        let Some(slot) = self.chunks.get_mut(&task.coord) else {
            return false;
        };
        if slot.epoch != task.epoch || slot.chunk.is_loaded() {
            return false;
        }
        slot.chunk.generate(&self.ctx, &self.store);
        log::trace!(target: "gen", "chunk ({}, {}) loaded", task.coord.cx, task.coord.cz);
        self.emit(WorldEvent::ChunkLoaded { coord: task.coord });
        true
    }

    /// One idle slot: runs every task whose deadline has arrived plus up to
    /// `idle_budget` others, then advances the queue clock. Returns chunks generated.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0usize;
        while let Some(task) = self.queue.pop_due() {
            if self.run_task(task) {
                ran += 1;
            }
        }
        let budget = self.params.streaming.idle_budget;
        let mut idle = 0usize;
        while idle < budget {
            let Some(task) = self.queue.pop_next() else {
                break;
            };
            if self.run_task(task) {
                idle += 1;
            }
        }
        self.queue.advance_tick();
        ran + idle
    }

    /// Runs every queued task now.
    pub fn flush(&mut self) -> usize {
        let mut ran = 0usize;
        while let Some(task) = self.queue.pop_next() {
            if self.run_task(task) {
                ran += 1;
            }
        }
        ran
    }

    pub fn save(&self) -> WorldSnapshot {
        WorldSnapshot {
            params: (*self.params).clone(),
            changes: self.store.entries(),
        }
    }

    /// Restores parameters and edits, then regenerates every streamed chunk.
    pub fn load(&mut self, snapshot: WorldSnapshot) {
        log::info!(
            target: "persist",
            "loading world: seed {}, {} edits",
            snapshot.params.seed,
            snapshot.changes.len()
        );
        self.params = Arc::new(snapshot.params.sanitized());
        self.store = ChangeStore::from_entries(snapshot.changes);
        self.regenerate();
    }

    /// Applies new parameters and regenerates. Edits are kept; a chunk size change
    /// re-keys them to the new chunk origins.
    pub fn set_params(&mut self, params: WorldParams) {
        let params = params.sanitized();
        let new_size = params.chunk_size();
        if new_size != self.ctx.size {
            self.store.rekey(new_size);
        }
        self.params = Arc::new(params);
        self.regenerate();
    }

    /// Starts a fresh world: drops every edit, then regenerates with `params`.
    pub fn new_world(&mut self, params: WorldParams) {
        log::info!(target: "edit", "new world: discarding {} edits", self.store.stats().block_edits);
        self.store.clear();
        self.params = Arc::new(params.sanitized());
        self.regenerate();
    }

    /// Discards every streamed chunk and streams again around the last observer.
    pub fn regenerate(&mut self) {
        self.ctx = GenCtx::new(Arc::clone(&self.params));
        let coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        for coord in coords {
            self.evict(coord);
        }
        self.queue.clear();
        log::info!(
            target: "gen",
            "regenerating: seed {}, chunk {}x{}, draw distance {}",
            self.params.seed,
            self.ctx.size.width,
            self.ctx.size.height,
            self.params.streaming.draw_distance
        );
        self.emit(WorldEvent::Regenerated);
        if let Some(observer) = self.observer {
            self.update(observer);
        }
    }
}
