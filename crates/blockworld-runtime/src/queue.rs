use std::collections::{BTreeMap, VecDeque};

use blockworld_world::ChunkCoord;

/// A deferred request to generate one chunk. `epoch` identifies the chunk entry the
/// request was made for; an entry that has been evicted or replaced since carries a
/// different epoch, and the task is then stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenTask {
    pub coord: ChunkCoord,
    pub epoch: u64,
}

/// Tick-bucketed queue of generation tasks keyed by deadline tick.
///
/// Tasks run either in an idle slot (earliest deadline first, FIFO within a tick) or
/// unconditionally once their deadline tick has arrived.
#[derive(Debug, Default)]
pub struct GenQueue {
    // deadline tick -> FIFO of tasks
    by_tick: BTreeMap<u64, VecDeque<GenTask>>,
    now: u64,
    len: usize,
}

impl GenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn schedule_at(&mut self, tick: u64, task: GenTask) {
        self.by_tick.entry(tick).or_default().push_back(task);
        self.len += 1;
    }

    pub fn schedule_after(&mut self, delta: u64, task: GenTask) {
        self.schedule_at(self.now.saturating_add(delta), task);
    }

    fn pop_front_bucket(&mut self, max_tick: u64) -> Option<GenTask> {
        let mut entry = self.by_tick.first_entry()?;
        if *entry.key() > max_tick {
            return None;
        }
        let task = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        if task.is_some() {
            self.len -= 1;
        }
        task
    }

    /// Next task whose deadline has arrived.
    pub fn pop_due(&mut self) -> Option<GenTask> {
        self.pop_front_bucket(self.now)
    }

    /// Next task in deadline order regardless of deadline.
    pub fn pop_next(&mut self) -> Option<GenTask> {
        self.pop_front_bucket(u64::MAX)
    }

    pub fn advance_tick(&mut self) {
        self.now = self.now.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        self.by_tick.clear();
        self.len = 0;
    }
}
