//! Block catalogue and per-cell block data.
#![forbid(unsafe_code)]

pub mod types;

pub use types::{Block, BlockId, BlockType, InstanceHandle};
