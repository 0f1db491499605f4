//! Persistent player edits, keyed by chunk origin and chunk-local position.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use blockworld_blocks::BlockType;
use blockworld_world::ChunkSize;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStoreStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
}

/// One stored edit in its serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub origin_x: i32,
    pub origin_z: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub block: BlockType,
}

/// Diff log of player edits. Outlives chunks: entries are only dropped by [`ChangeStore::clear`]
/// (or by re-keying to a smaller chunk height).
#[derive(Default, Debug, Clone)]
pub struct ChangeStore {
    // (origin_x, origin_z) -> (x, y, z) -> block
    inner: HashMap<(i32, i32), HashMap<(i32, i32, i32), BlockType>>,
}

impl ChangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ChangeStoreStats {
        ChangeStoreStats {
            chunk_entries: self.inner.len(),
            block_edits: self.inner.values().map(|m| m.len()).sum(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, origin_x: i32, origin_z: i32, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.inner
            .get(&(origin_x, origin_z))
            .and_then(|m| m.get(&(x, y, z)).copied())
    }

    pub fn set(&mut self, origin_x: i32, origin_z: i32, x: i32, y: i32, z: i32, block: BlockType) {
        self.inner
            .entry((origin_x, origin_z))
            .or_default()
            .insert((x, y, z), block);
    }

    #[inline]
    pub fn contains(&self, origin_x: i32, origin_z: i32, x: i32, y: i32, z: i32) -> bool {
        self.get(origin_x, origin_z, x, y, z).is_some()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Edits stored for the chunk whose origin is `(origin_x, origin_z)`.
    pub fn chunk_edits(
        &self,
        origin_x: i32,
        origin_z: i32,
    ) -> impl Iterator<Item = ((i32, i32, i32), BlockType)> + '_ {
        self.inner
            .get(&(origin_x, origin_z))
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (*k, *v)))
    }

    /// Full contents in a stable order, for persistence.
    pub fn entries(&self) -> Vec<ChangeEntry> {
        let mut out: Vec<ChangeEntry> = self
            .inner
            .iter()
            .flat_map(|(&(origin_x, origin_z), m)| {
                m.iter().map(move |(&(x, y, z), &block)| ChangeEntry {
                    origin_x,
                    origin_z,
                    x,
                    y,
                    z,
                    block,
                })
            })
            .collect();
        out.sort_by_key(|e| (e.origin_x, e.origin_z, e.x, e.y, e.z));
        out
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ChangeEntry>,
    {
        let mut store = Self::new();
        for e in entries {
            store.set(e.origin_x, e.origin_z, e.x, e.y, e.z, e.block);
        }
        store
    }

    /// Re-keys every edit for a new chunk size, preserving its absolute world position.
    /// Edits above the new height are dropped.
    pub fn rekey(&mut self, new_size: ChunkSize) {
        let before = self.stats().block_edits;
        let entries = self.entries();
        self.inner.clear();
        let mut dropped = 0usize;
        for e in entries {
            let wx = e.origin_x + e.x;
            let wz = e.origin_z + e.z;
            match new_size.world_to_chunk(wx, e.y, wz) {
                Some((coord, local)) => {
                    let (ox, oz) = new_size.origin(coord);
                    self.set(
                        ox,
                        oz,
                        local.x as i32,
                        local.y as i32,
                        local.z as i32,
                        e.block,
                    );
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            log::warn!(
                target: "edit",
                "dropped {} of {} edits outside new chunk height {}",
                dropped,
                before,
                new_size.height
            );
        }
        log::info!(
            target: "edit",
            "re-keyed {} edits for chunk size {}x{}",
            before - dropped,
            new_size.width,
            new_size.height
        );
    }
}
