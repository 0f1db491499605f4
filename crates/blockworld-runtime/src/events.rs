use blockworld_blocks::BlockType;
use blockworld_world::ChunkCoord;

/// Changes a renderer or other observer of the world needs to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// A chunk finished generating and is queryable.
    ChunkLoaded { coord: ChunkCoord },
    /// A chunk left the streamed set and its instances were released.
    ChunkUnloaded { coord: ChunkCoord },
    BlockAdded { x: i32, y: i32, z: i32, kind: BlockType },
    BlockRemoved { x: i32, y: i32, z: i32, kind: BlockType },
    /// Every streamed chunk was discarded and rescheduled.
    Regenerated,
}
