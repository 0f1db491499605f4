//! World streaming: live chunk set, deferred generation, edits and regeneration.
#![forbid(unsafe_code)]

mod events;
mod manager;
mod queue;

pub use events::WorldEvent;
pub use manager::{MAX_PENDING_EVENTS, WorldManager, WorldSnapshot};
pub use queue::{GenQueue, GenTask};
