//! Fixed-step cylinder-versus-voxel collision for a walking body.
#![forbid(unsafe_code)]

mod body;
mod engine;

pub use body::{Body, BodyInput};
pub use engine::{Contact, Physics};
