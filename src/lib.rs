//! Reset a scene node's local position, rotation or scale without moving,
//! turning or resizing its immediate children in world space.

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod ecs;
pub mod editor;
pub mod logging;
pub mod transform;

//Re-exports
pub use glam;
pub use legion;
pub use log;
