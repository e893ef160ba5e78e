//! Local-space transform channels of a scene node.
//!
//! All three are relative to the node's `Parent` when it has one, and to the
//! world origin otherwise. World values are never stored; they are resolved
//! on demand by `World`.

use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position(pub Vec3);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation(pub Quat);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale(pub Vec3);

impl Default for Position {
    fn default() -> Self {
        Position(Vec3::ZERO)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation(Quat::IDENTITY)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale(Vec3::ONE)
    }
}

/// Builds the local TRS matrix from the three channels.
pub fn local_matrix(position: &Position, rotation: &Rotation, scale: &Scale) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale.0, rotation.0, position.0)
}
