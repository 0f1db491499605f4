use std::collections::{BTreeMap, VecDeque};

use blockworld_blocks::BlockType;
use blockworld_physics::BodyInput;

/// Host intents delivered to the app at a given frame tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    MovementRequested { input: BodyInput, yaw: f32 },
    ResetRequested,
    PlaceBlockRequested { x: i32, y: i32, z: i32, kind: BlockType },
    RemoveBlockRequested { x: i32, y: i32, z: i32 },
    /// Remove the block directly under the body's feet.
    DigRequested,
    SaveRequested,
}

#[derive(Debug)]
pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

pub struct EventQueue {
    // map of tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        self.emit_at(self.now, kind)
    }

    pub fn emit_at(&mut self, tick: u64, kind: Event) -> u64 {
        let id = self.alloc_id();
        // Past ticks are delivered on the current one
        let tick = tick.max(self.now);
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn emit_after(&mut self, delta: u64, kind: Event) -> u64 {
        self.emit_at(self.now + delta, kind)
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        let mut entry = self.by_tick.first_entry()?;
        if *entry.key() > self.now {
            return None;
        }
        let env = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        env
    }

    pub fn advance_tick(&mut self) {
        self.now = self.now.wrapping_add(1);
    }

    pub fn pending(&self) -> usize {
        self.by_tick.values().map(|q| q.len()).sum()
    }
}
