use std::path::PathBuf;

use blockworld_geom::{Vec3, block_coord};
use blockworld_io::save_world;
use blockworld_physics::{Body, BodyInput, Physics};
use blockworld_runtime::{WorldEvent, WorldManager};
use blockworld_world::WorldParams;

use crate::event::{Event, EventQueue};

/// Counters reported at the end of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub physics_steps: u64,
    pub chunks_loaded: u64,
    pub chunks_unloaded: u64,
    pub blocks_added: u64,
    pub blocks_removed: u64,
    pub regenerations: u64,
}

/// Headless host: owns the world, one body, and the input queue, and runs frames.
pub struct App {
    pub world: WorldManager,
    pub physics: Physics,
    pub body: Body,
    pub events: EventQueue,
    pub stats: RunStats,
    input: BodyInput,
    save_dir: Option<PathBuf>,
}

impl App {
    pub fn new(params: WorldParams, save_dir: Option<PathBuf>) -> Self {
        let mut app = Self {
            world: WorldManager::new(params),
            physics: Physics::new(),
            body: Body::new(Vec3::ZERO),
            events: EventQueue::new(),
            stats: RunStats::default(),
            input: BodyInput::default(),
            save_dir,
        };
        app.respawn();
        app
    }

    /// Streams around the origin, finishes generation there, and drops the body on top
    /// of the origin column.
    pub fn respawn(&mut self) {
        self.world.update(Vec3::ZERO);
        self.world.flush();
        let top = self
            .world
            .surface_height(0, 0)
            .unwrap_or(self.world.chunk_size().height as i32 - 1);
        let spawn = Vec3::new(0.0, top as f32 + 1.5, 0.0);
        self.body.reset(spawn);
        log::info!("spawned at ({:.1}, {:.1}, {:.1})", spawn.x, spawn.y, spawn.z);
    }

    /// One frame: input events, physics, streaming, then one generation slot.
    pub fn step(&mut self, dt: f32) {
        while let Some(env) = self.events.pop_ready() {
            self.handle(env.kind);
        }

        let world = &self.world;
        let sample = |x: i32, y: i32, z: i32| world.get_block(x, y, z);
        let steps = self
            .physics
            .update(dt, &mut self.body, self.input, &sample);
        self.stats.physics_steps += u64::from(steps);

        self.world.update(self.body.position);
        self.world.pump();
        self.collect_world_events();

        self.events.advance_tick();
        self.stats.frames += 1;
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::MovementRequested { input, yaw } => {
                self.input = input;
                self.body.yaw = yaw;
            }
            Event::ResetRequested => self.respawn(),
            Event::PlaceBlockRequested { x, y, z, kind } => {
                if !self.world.add_block(x, y, z, kind) {
                    log::debug!("place {} at ({}, {}, {}) rejected", kind.name(), x, y, z);
                }
            }
            Event::RemoveBlockRequested { x, y, z } => {
                if !self.world.remove_block(x, y, z) {
                    log::debug!("remove at ({}, {}, {}) rejected", x, y, z);
                }
            }
            Event::DigRequested => {
                let p = self.body.position;
                // Feet rest on the top face of the block below
                let (x, y, z) = (block_coord(p.x), block_coord(p.y - 0.5), block_coord(p.z));
                if !self.world.remove_block(x, y, z) {
                    log::debug!("nothing to dig at ({}, {}, {})", x, y, z);
                }
            }
            Event::SaveRequested => self.save(),
        }
    }

    fn save(&self) {
        let Some(dir) = &self.save_dir else {
            log::warn!(target: "persist", "save requested without a save directory");
            return;
        };
        if let Err(e) = save_world(dir, &self.world.save()) {
            log::error!(target: "persist", "save failed: {}", e);
        }
    }

    fn collect_world_events(&mut self) {
        for e in self.world.drain_events() {
            match e {
                WorldEvent::ChunkLoaded { .. } => self.stats.chunks_loaded += 1,
                WorldEvent::ChunkUnloaded { .. } => self.stats.chunks_unloaded += 1,
                WorldEvent::BlockAdded { .. } => self.stats.blocks_added += 1,
                WorldEvent::BlockRemoved { .. } => self.stats.blocks_removed += 1,
                WorldEvent::Regenerated => self.stats.regenerations += 1,
            }
        }
    }
}
