use blockworld_blocks::BlockType;
use blockworld_geom::Vec3;
use blockworld_runtime::{MAX_PENDING_EVENTS, WorldEvent, WorldManager};
use std::sync::Arc;

use blockworld_world::{GenCtx, WorldParams};

fn quiet_params() -> WorldParams {
    let mut p = WorldParams::default();
    p.seed = 9;
    p.streaming.chunk_width = 8;
    p.streaming.chunk_height = 16;
    p.streaming.draw_distance = 1;
    p.streaming.async_loading = false;
    p.trees.frequency = 0.0;
    p.clouds.density = 0.0;
    p
}

fn world() -> WorldManager {
    let mut w = WorldManager::new(quiet_params());
    w.update(Vec3::new(3.0, 10.0, 3.0));
    w
}

#[test]
fn add_and_remove_round_trip() {
    let mut w = world();
    let top = w.surface_height(3, 3).unwrap();
    let y = top + 1;
    assert_eq!(w.get_block(3, y, 3).map(|b| b.kind), Some(BlockType::Empty));

    assert!(w.add_block(3, y, 3, BlockType::Stone));
    let placed = w.get_block(3, y, 3).unwrap();
    assert_eq!(placed.kind, BlockType::Stone);
    assert!(placed.instance.is_some());
    assert_eq!(w.surface_height(3, 3), Some(y));
    assert!(w.change_store().contains(0, 0, 3, y, 3));

    // Occupied cell
    assert!(!w.add_block(3, y, 3, BlockType::Dirt));

    assert!(w.remove_block(3, y, 3));
    assert_eq!(w.get_block(3, y, 3).map(|b| b.kind), Some(BlockType::Empty));
    assert_eq!(w.change_store().get(0, 0, 3, y, 3), Some(BlockType::Empty));
    assert!(!w.remove_block(3, y, 3));

    let edits: Vec<WorldEvent> = w
        .drain_events()
        .filter(|e| matches!(e, WorldEvent::BlockAdded { .. } | WorldEvent::BlockRemoved { .. }))
        .collect();
    assert_eq!(
        edits,
        vec![
            WorldEvent::BlockAdded { x: 3, y, z: 3, kind: BlockType::Stone },
            WorldEvent::BlockRemoved { x: 3, y, z: 3, kind: BlockType::Stone },
        ]
    );
}

#[test]
fn negative_coordinates_key_to_their_chunk_origin() {
    let mut w = world();
    assert!(w.remove_block(-1, 0, -8));
    // (-1, -8) lives in chunk (-1, -1) at local (7, 0)
    assert_eq!(w.change_store().get(-8, -8, 7, 0, 0), Some(BlockType::Empty));
}

#[test]
fn edits_survive_regeneration() {
    let mut w = world();
    assert!(w.remove_block(2, 0, 2));
    w.regenerate();
    assert_eq!(w.get_block(2, 0, 2).map(|b| b.kind), Some(BlockType::Empty));
    assert!(w.drain_events().any(|e| e == WorldEvent::Regenerated));
}

#[test]
fn edits_survive_eviction() {
    let mut w = world();
    assert!(w.remove_block(1, 0, 1));
    w.update(Vec3::new(500.0, 0.0, 500.0));
    assert_eq!(w.get_block(1, 0, 1), None);
    w.update(Vec3::new(3.0, 10.0, 3.0));
    assert_eq!(w.get_block(1, 0, 1).map(|b| b.kind), Some(BlockType::Empty));
}

#[test]
fn new_world_discards_edits() {
    let mut w = world();
    let before = w.get_block(2, 0, 2).map(|b| b.kind);
    assert!(w.remove_block(2, 0, 2));
    w.new_world(quiet_params());
    assert!(w.change_store().is_empty());
    assert_eq!(w.get_block(2, 0, 2).map(|b| b.kind), before);
}

#[test]
fn chunk_width_change_keeps_edit_positions() {
    let mut w = world();
    let top = w.surface_height(5, -3).unwrap();
    assert!(w.add_block(5, top + 1, -3, BlockType::CoalOre));
    let mut p = quiet_params();
    p.streaming.chunk_width = 16;
    w.set_params(p);
    assert_eq!(w.chunk_size().width, 16);
    assert_eq!(
        w.get_block(5, top + 1, -3).map(|b| b.kind),
        Some(BlockType::CoalOre)
    );
    assert!(w.change_store().contains(0, -16, 5, top + 1, 13));
}

#[test]
fn save_and_load_rebuild_the_world() {
    let mut w = world();
    let top = w.surface_height(4, 4).unwrap();
    assert!(w.add_block(4, top + 1, 4, BlockType::Leaves));
    assert!(w.remove_block(4, 0, 5));
    let snapshot = w.save();
    assert_eq!(snapshot.changes.len(), 2);

    let mut other = WorldManager::new(WorldParams::default());
    other.update(Vec3::new(3.0, 10.0, 3.0));
    other.load(snapshot.clone());
    assert_eq!(other.params(), &quiet_params().sanitized());
    assert_eq!(other.get_block(4, top + 1, 4).map(|b| b.kind), Some(BlockType::Leaves));
    assert_eq!(other.get_block(4, 0, 5).map(|b| b.kind), Some(BlockType::Empty));
    assert_eq!(other.save(), snapshot);
}

#[test]
fn surface_height_ignores_cloud_layer() {
    let mut p = quiet_params();
    p.clouds.density = 1.0;
    let ctx = GenCtx::new(Arc::new(p.clone().sanitized()));
    let mut w = WorldManager::new(p);
    w.update(Vec3::new(3.0, 10.0, 3.0));
    let h = w.chunk_size().height as i32;

    let mut clouds = 0;
    let mut below_clouds = 0;
    for wx in 0..8 {
        for wz in 0..8 {
            if w.get_block(wx, h - 1, wz).map(|b| b.kind) == Some(BlockType::Cloud) {
                clouds += 1;
            }
            let top = w.surface_height(wx, wz).unwrap();
            assert_ne!(w.get_block(wx, top, wz).map(|b| b.kind), Some(BlockType::Cloud));
            let terrain = ctx.surface_height(wx, wz) as i32;
            if terrain < h - 1 {
                below_clouds += 1;
                assert_eq!(top, terrain, "column ({wx}, {wz})");
            }
        }
    }
    assert!(clouds > 0);
    assert!(below_clouds > 0);
}

#[test]
fn undrained_events_are_capped() {
    let mut w = world();
    let y = w.surface_height(2, 2).unwrap() + 1;
    for _ in 0..MAX_PENDING_EVENTS {
        assert!(w.add_block(2, y, 2, BlockType::Stone));
        assert!(w.remove_block(2, y, 2));
    }
    let events: Vec<WorldEvent> = w.drain_events().collect();
    assert_eq!(events.len(), MAX_PENDING_EVENTS);
    assert_eq!(
        events.last(),
        Some(&WorldEvent::BlockRemoved { x: 2, y, z: 2, kind: BlockType::Stone })
    );
    assert!(!events.iter().any(|e| matches!(e, WorldEvent::ChunkLoaded { .. })));
    assert_eq!(w.drain_events().count(), 0);
}
