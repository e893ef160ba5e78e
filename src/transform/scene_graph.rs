use std::fmt::Debug;

use glam::{Quat, Vec3};

/// Read/write access to a host transform hierarchy.
///
/// World-space getters must reflect every local write made before them, the
/// compensator reads world values back right after mutating a parent.
pub trait SceneGraph {
    type Node: Copy + Debug;

    /// Immediate children of `node`, in hierarchy order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn local_position(&self, node: Self::Node) -> Vec3;
    fn local_rotation(&self, node: Self::Node) -> Quat;
    fn local_scale(&self, node: Self::Node) -> Vec3;

    fn set_local_position(&mut self, node: Self::Node, position: Vec3);
    fn set_local_rotation(&mut self, node: Self::Node, rotation: Quat);
    fn set_local_scale(&mut self, node: Self::Node, scale: Vec3);

    fn position(&self, node: Self::Node) -> Vec3;
    fn rotation(&self, node: Self::Node) -> Quat;
    /// World scale with shear and rotation interaction discarded.
    fn lossy_scale(&self, node: Self::Node) -> Vec3;

    fn set_position(&mut self, node: Self::Node, position: Vec3);
    fn set_rotation(&mut self, node: Self::Node, rotation: Quat);

    fn set_position_and_rotation(&mut self, node: Self::Node, position: Vec3, rotation: Quat) {
        self.set_rotation(node, rotation);
        self.set_position(node, position);
    }
}
