//! Resetting a node's local transform while keeping its children in place.
//!
//! Every operation first captures the world state of the children, then
//! resets the parent and writes compensated values back into the children.
//! Nothing is validated here: zero-scale ancestors turn into non-finite child
//! scales and are left for the caller to deal with.

use glam::{Quat, Vec3};

use super::{scene_graph::SceneGraph, snapshot::Snapshot};

pub struct TransformCompensator;

impl TransformCompensator {
    /// Moves the parent to a zero local position and shifts every child back
    /// by the world offset that move introduced.
    pub fn reset_position<G: SceneGraph>(graph: &mut G, parent: G::Node, children: &[G::Node]) {
        let offset = graph.position(parent);

        graph.set_local_position(parent, Vec3::ZERO);
        let offset = graph.position(parent) - offset;

        for &child in children {
            let position = graph.position(child);
            graph.set_position(child, position - offset);
        }
    }

    /// Clears the parent's local rotation and reassigns each child its
    /// previous world rotation. Child positions follow the parent.
    pub fn reset_rotation<G: SceneGraph>(graph: &mut G, parent: G::Node, children: &[G::Node]) {
        let snapshot = Snapshot::capture(graph, parent, children);

        graph.set_local_rotation(parent, Quat::IDENTITY);

        for (child, before) in &snapshot.children {
            graph.set_rotation(*child, before.rotation);
        }
    }

    /// Sets the parent's local scale to one and rescales each child so its
    /// lossy scale matches the captured one.
    ///
    /// Only exact for hierarchies without rotation induced shear.
    pub fn reset_scale<G: SceneGraph>(graph: &mut G, parent: G::Node, children: &[G::Node]) {
        let snapshot = Snapshot::capture(graph, parent, children);

        graph.set_local_scale(parent, Vec3::ONE);

        for (child, before) in &snapshot.children {
            Self::restore_lossy_scale(graph, *child, before.lossy_scale);
        }
    }

    /// Resets scale, rotation and position of the parent in one pass.
    pub fn reset_all<G: SceneGraph>(graph: &mut G, parent: G::Node, children: &[G::Node]) {
        let snapshot = Snapshot::capture(graph, parent, children);

        graph.set_local_scale(parent, Vec3::ONE);
        graph.set_local_rotation(parent, Quat::IDENTITY);
        graph.set_local_position(parent, Vec3::ZERO);

        for (child, before) in &snapshot.children {
            Self::restore_lossy_scale(graph, *child, before.lossy_scale);
            graph.set_position_and_rotation(*child, before.position, before.rotation);
        }
    }

    // Unit local scale first, so the remaining lossy scale is what the
    // ancestors contribute on their own.
    fn restore_lossy_scale<G: SceneGraph>(graph: &mut G, child: G::Node, target: Vec3) {
        graph.set_local_scale(child, Vec3::ONE);
        let inherited = graph.lossy_scale(child);
        graph.set_local_scale(child, target / inherited);
    }
}
