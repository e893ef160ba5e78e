use anyhow::{bail, Result};
use glam::{Mat3, Mat4, Quat, Vec3};
use legion::{storage::Component, Entity, EntityStore};

use crate::{
    ecs::components::{
        hierarchy_components::{Children, Parent, RectLayout},
        transformation_components::{local_matrix, Position, Rotation, Scale},
    },
    ecs::entities::entity_types::{NodeEntity, RectNodeEntity},
    transform::scene_graph::SceneGraph,
};

/// Scene hierarchy stored in a legion world.
///
/// Nodes only carry local channels; world values are recomposed from the
/// ancestor chain every time they are asked for.
pub struct World {
    pub legion_world: legion::World,
}

impl Default for World {
    fn default() -> Self {
        World {
            legion_world: legion::World::default(),
        }
    }
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    pub fn spawn_node(&mut self, position: Vec3, rotation: Quat, scale: Vec3) -> Entity {
        let node: NodeEntity = (
            Position(position),
            Rotation(rotation.normalize()),
            Scale(scale),
        );
        self.legion_world.push(node)
    }

    pub fn spawn_rect_node(&mut self, position: Vec3, rotation: Quat, scale: Vec3) -> Entity {
        let node: RectNodeEntity = (
            Position(position),
            Rotation(rotation.normalize()),
            Scale(scale),
            RectLayout,
        );
        self.legion_world.push(node)
    }

    /// Spawns a node already attached to `parent`, with local channels given
    /// relative to it.
    pub fn spawn_child(
        &mut self,
        parent: Entity,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Result<Entity> {
        let child = self.spawn_node(position, rotation, scale);
        self.set_parent(child, Some(parent))?;
        Ok(child)
    }

    /// Re-attaches `child`, keeping its local channels as they are.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<()> {
        if !self.legion_world.contains(child) {
            bail!("entity {:?} does not exist", child);
        }

        if let Some(parent) = parent {
            if !self.legion_world.contains(parent) {
                bail!("parent {:?} does not exist", parent);
            }
            let mut ancestor = Some(parent);
            while let Some(node) = ancestor {
                if node == child {
                    bail!("attaching {:?} under {:?} would create a cycle", child, parent);
                }
                ancestor = self.parent(node);
            }
        }

        if let Some(old_parent) = self.parent(child) {
            let mut siblings = self.children_of(old_parent);
            siblings.retain(|sibling| *sibling != child);
            self.set_component(old_parent, Children(siblings));
        }

        match parent {
            Some(parent) => {
                self.set_component(child, Parent(parent));
                let mut children = self.children_of(parent);
                children.push(child);
                self.set_component(parent, Children(children));
                log::trace!("attached {:?} to {:?}", child, parent);
            }
            None => {
                if let Some(mut entry) = self.legion_world.entry(child) {
                    entry.remove_component::<Parent>();
                }
                log::trace!("detached {:?}", child);
            }
        }

        Ok(())
    }

    /// Removes a node. It is detached from its parent first; its own children
    /// become roots with their local channels untouched.
    pub fn despawn(&mut self, entity: Entity) -> Result<()> {
        self.set_parent(entity, None)?;
        for child in self.children_of(entity) {
            self.set_parent(child, None)?;
        }
        self.legion_world.remove(entity);
        log::trace!("despawned {:?}", entity);
        Ok(())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.legion_world.contains(entity)
    }

    /// Whether the entity carries all three local transform channels.
    pub fn has_transform(&self, entity: Entity) -> bool {
        self.legion_world
            .entry_ref(entity)
            .map(|entry| {
                entry.get_component::<Position>().is_ok()
                    && entry.get_component::<Rotation>().is_ok()
                    && entry.get_component::<Scale>().is_ok()
            })
            .unwrap_or(false)
    }

    pub fn is_rect(&self, entity: Entity) -> bool {
        self.legion_world
            .entry_ref(entity)
            .map(|entry| entry.get_component::<RectLayout>().is_ok())
            .unwrap_or(false)
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.legion_world
            .entry_ref(entity)
            .ok()
            .and_then(|entry| entry.get_component::<Parent>().ok().map(|parent| parent.0))
    }

    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        let local = local_matrix(
            &self.component(entity),
            &self.component(entity),
            &self.component(entity),
        );
        match self.parent(entity) {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    fn children_of(&self, entity: Entity) -> Vec<Entity> {
        self.legion_world
            .entry_ref(entity)
            .ok()
            .and_then(|entry| entry.get_component::<Children>().ok().map(|c| c.0.clone()))
            .unwrap_or_default()
    }

    // Missing components read as their identity value.
    fn component<T: Component + Copy + Default>(&self, entity: Entity) -> T {
        self.legion_world
            .entry_ref(entity)
            .ok()
            .and_then(|entry| entry.get_component::<T>().ok().copied())
            .unwrap_or_default()
    }

    fn set_component<T: Component>(&mut self, entity: Entity, value: T) {
        if let Some(mut entry) = self.legion_world.entry(entity) {
            if let Ok(component) = entry.get_component_mut::<T>() {
                *component = value;
                return;
            }
            entry.add_component(value);
        }
    }
}

impl SceneGraph for World {
    type Node = Entity;

    fn children(&self, node: Entity) -> Vec<Entity> {
        self.children_of(node)
    }

    fn local_position(&self, node: Entity) -> Vec3 {
        self.component::<Position>(node).0
    }

    fn local_rotation(&self, node: Entity) -> Quat {
        self.component::<Rotation>(node).0
    }

    fn local_scale(&self, node: Entity) -> Vec3 {
        self.component::<Scale>(node).0
    }

    fn set_local_position(&mut self, node: Entity, position: Vec3) {
        self.set_component(node, Position(position));
    }

    fn set_local_rotation(&mut self, node: Entity, rotation: Quat) {
        self.set_component(node, Rotation(rotation.normalize()));
    }

    fn set_local_scale(&mut self, node: Entity, scale: Vec3) {
        self.set_component(node, Scale(scale));
    }

    fn position(&self, node: Entity) -> Vec3 {
        self.world_matrix(node).w_axis.truncate()
    }

    fn rotation(&self, node: Entity) -> Quat {
        let local = self.local_rotation(node);
        match self.parent(node) {
            Some(parent) => self.rotation(parent) * local,
            None => local,
        }
    }

    fn lossy_scale(&self, node: Entity) -> Vec3 {
        let rotation_scale = Mat3::from_mat4(self.world_matrix(node));
        let unrotated = Mat3::from_quat(self.rotation(node).inverse()) * rotation_scale;
        Vec3::new(unrotated.x_axis.x, unrotated.y_axis.y, unrotated.z_axis.z)
    }

    fn set_position(&mut self, node: Entity, position: Vec3) {
        let local = match self.parent(node) {
            Some(parent) => self.world_matrix(parent).inverse().transform_point3(position),
            None => position,
        };
        self.set_local_position(node, local);
    }

    fn set_rotation(&mut self, node: Entity, rotation: Quat) {
        let local = match self.parent(node) {
            Some(parent) => self.rotation(parent).inverse() * rotation,
            None => rotation,
        };
        self.set_local_rotation(node, local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_near(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn world_values_compose_up_the_chain() {
        let mut world = World::new();
        let root = world.spawn_node(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::splat(2.0));
        let child = world
            .spawn_child(root, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY, Vec3::new(1.0, 3.0, 0.5))
            .unwrap();

        assert_vec_near(world.position(child), Vec3::new(3.0, 2.0, 3.0));
        assert_vec_near(world.lossy_scale(child), Vec3::new(2.0, 6.0, 1.0));
    }

    #[test]
    fn rotated_parent_moves_child_and_keeps_lossy_scale() {
        let mut world = World::new();
        let root = world.spawn_node(
            Vec3::ZERO,
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::ONE,
        );
        let child = world
            .spawn_child(root, Vec3::X, Quat::IDENTITY, Vec3::new(2.0, 3.0, 4.0))
            .unwrap();

        assert_vec_near(world.position(child), Vec3::Y);
        assert_vec_near(world.lossy_scale(child), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn world_setters_round_trip_through_parent() {
        let mut world = World::new();
        let root = world.spawn_node(
            Vec3::new(4.0, -1.0, 2.0),
            Quat::from_rotation_y(0.7),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let child = world
            .spawn_child(root, Vec3::ONE, Quat::IDENTITY, Vec3::ONE)
            .unwrap();

        let target = Quat::from_rotation_x(0.3);
        world.set_position_and_rotation(child, Vec3::new(-5.0, 1.0, 0.5), target);

        assert_vec_near(world.position(child), Vec3::new(-5.0, 1.0, 0.5));
        assert!(world.rotation(child).abs_diff_eq(target, 1e-5));
    }

    #[test]
    fn children_keep_attach_order_and_follow_reparenting() {
        let mut world = World::new();
        let a = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let b = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let first = world.spawn_child(a, Vec3::X, Quat::IDENTITY, Vec3::ONE).unwrap();
        let second = world.spawn_child(a, Vec3::Y, Quat::IDENTITY, Vec3::ONE).unwrap();

        assert_eq!(world.children(a), vec![first, second]);

        world.set_parent(first, Some(b)).unwrap();
        assert_eq!(world.children(a), vec![second]);
        assert_eq!(world.children(b), vec![first]);
        assert_eq!(world.parent(first), Some(b));

        world.set_parent(first, None).unwrap();
        assert!(world.children(b).is_empty());
        assert_eq!(world.parent(first), None);
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut world = World::new();
        let root = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let child = world.spawn_child(root, Vec3::X, Quat::IDENTITY, Vec3::ONE).unwrap();

        assert!(world.set_parent(root, Some(child)).is_err());
        assert!(world.set_parent(root, Some(root)).is_err());
        assert_eq!(world.parent(root), None);
    }

    #[test]
    fn despawn_detaches_from_parent_and_orphans_children() {
        let mut world = World::new();
        let root = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let middle = world.spawn_child(root, Vec3::X, Quat::IDENTITY, Vec3::ONE).unwrap();
        let sibling = world.spawn_child(root, Vec3::Y, Quat::IDENTITY, Vec3::ONE).unwrap();
        let leaf = world.spawn_child(middle, Vec3::Z, Quat::IDENTITY, Vec3::ONE).unwrap();

        world.despawn(middle).unwrap();

        assert!(!world.contains(middle));
        assert_eq!(world.children(root), vec![sibling]);
        assert_eq!(world.parent(leaf), None);
        assert_eq!(world.local_position(leaf), Vec3::Z);
        assert!(world.despawn(middle).is_err());
    }

    #[test]
    fn rect_nodes_are_told_apart() {
        let mut world = World::new();
        let plain = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let rect = world.spawn_rect_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let bare = world.legion_world.push((Parent(plain),));

        assert!(!world.is_rect(plain));
        assert!(world.is_rect(rect));
        assert!(world.has_transform(rect));
        assert!(!world.has_transform(bare));
    }
}
