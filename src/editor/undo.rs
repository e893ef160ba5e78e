use std::collections::VecDeque;

use glam::{Quat, Vec3};

use crate::transform::SceneGraph;

/// Complete local state of a node, enough to put it back exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalState {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalState {
    fn capture<G: SceneGraph>(graph: &G, node: G::Node) -> Self {
        LocalState {
            position: graph.local_position(node),
            rotation: graph.local_rotation(node),
            scale: graph.local_scale(node),
        }
    }

    fn apply<G: SceneGraph>(&self, graph: &mut G, node: G::Node) {
        graph.set_local_position(node, self.position);
        graph.set_local_rotation(node, self.rotation);
        graph.set_local_scale(node, self.scale);
    }
}

#[derive(Clone, Debug)]
pub struct Checkpoint<N> {
    pub label: String,
    pub nodes: Vec<(N, LocalState)>,
}

impl<N: Copy> Checkpoint<N> {
    pub fn capture<G: SceneGraph<Node = N>>(graph: &G, label: &str, nodes: &[N]) -> Self {
        Checkpoint {
            label: label.to_string(),
            nodes: nodes
                .iter()
                .map(|&node| (node, LocalState::capture(graph, node)))
                .collect(),
        }
    }

    fn restore<G: SceneGraph<Node = N>>(&self, graph: &mut G) {
        for (node, state) in &self.nodes {
            state.apply(graph, *node);
        }
    }

    fn recapture<G: SceneGraph<Node = N>>(&self, graph: &G) -> Self {
        Checkpoint {
            label: self.label.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|(node, _)| (*node, LocalState::capture(graph, *node)))
                .collect(),
        }
    }
}

/// Bounded undo/redo stacks of labelled checkpoints.
pub struct UndoHistory<N> {
    undo: VecDeque<Checkpoint<N>>,
    redo: Vec<Checkpoint<N>>,
    depth: usize,
}

impl<N: Copy> UndoHistory<N> {
    pub fn new(depth: usize) -> Self {
        UndoHistory {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth,
        }
    }

    /// Records the current state of `nodes` as one undoable step.
    pub fn record<G: SceneGraph<Node = N>>(&mut self, graph: &G, label: &str, nodes: &[N]) {
        if self.depth == 0 {
            return;
        }
        self.redo.clear();
        self.undo.push_back(Checkpoint::capture(graph, label, nodes));
        while self.undo.len() > self.depth {
            if let Some(dropped) = self.undo.pop_front() {
                log::debug!("undo history full, dropped \"{}\"", dropped.label);
            }
        }
    }

    /// Reverts the latest step and returns its label.
    pub fn undo<G: SceneGraph<Node = N>>(&mut self, graph: &mut G) -> Option<String> {
        let checkpoint = self.undo.pop_back()?;
        self.redo.push(checkpoint.recapture(graph));
        checkpoint.restore(graph);
        Some(checkpoint.label)
    }

    pub fn redo<G: SceneGraph<Node = N>>(&mut self, graph: &mut G) -> Option<String> {
        let checkpoint = self.redo.pop()?;
        self.undo.push_back(checkpoint.recapture(graph));
        checkpoint.restore(graph);
        Some(checkpoint.label)
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|checkpoint| checkpoint.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ecs::world::World, transform::TransformCompensator};

    fn assert_state_near(actual: LocalState, expected: LocalState) {
        assert!(actual.position.abs_diff_eq(expected.position, 1e-6));
        assert!(actual.rotation.abs_diff_eq(expected.rotation, 1e-6));
        assert!(actual.scale.abs_diff_eq(expected.scale, 1e-6));
    }

    #[test]
    fn undo_restores_parent_and_children_as_one_step() {
        let mut world = World::new();
        let parent = world.spawn_node(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.5),
            Vec3::splat(2.0),
        );
        let child = world
            .spawn_child(parent, Vec3::X, Quat::from_rotation_z(0.2), Vec3::ONE)
            .unwrap();
        let before = [
            LocalState::capture(&world, parent),
            LocalState::capture(&world, child),
        ];

        let mut history = UndoHistory::new(8);
        history.record(&world, "Reset ALL Without Altering Children", &[parent, child]);
        TransformCompensator::reset_all(&mut world, parent, &[child]);

        assert_eq!(
            history.undo(&mut world).as_deref(),
            Some("Reset ALL Without Altering Children")
        );
        assert_state_near(LocalState::capture(&world, parent), before[0]);
        assert_state_near(LocalState::capture(&world, child), before[1]);
        assert!(history.is_empty());
    }

    #[test]
    fn redo_replays_the_undone_step() {
        let mut world = World::new();
        let parent = world.spawn_node(Vec3::new(4.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE);
        let child = world.spawn_child(parent, Vec3::X, Quat::IDENTITY, Vec3::ONE).unwrap();

        let mut history = UndoHistory::new(8);
        history.record(&world, "Reset Position Without Altering Children", &[parent, child]);
        TransformCompensator::reset_position(&mut world, parent, &[child]);
        let after = LocalState::capture(&world, child);

        history.undo(&mut world);
        assert_eq!(world.local_position(parent), Vec3::new(4.0, 0.0, 0.0));

        assert!(history.redo(&mut world).is_some());
        assert_eq!(world.local_position(parent), Vec3::ZERO);
        assert_state_near(LocalState::capture(&world, child), after);
        assert!(history.redo(&mut world).is_none());
    }

    #[test]
    fn history_is_bounded_and_recording_clears_redo() {
        let mut world = World::new();
        let node = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);

        let mut history = UndoHistory::new(2);
        for label in ["a", "b", "c"] {
            history.record(&world, label, &[node]);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo_label(), Some("c"));

        history.undo(&mut world);
        history.record(&world, "d", &[node]);
        assert!(history.redo(&mut world).is_none());
        assert_eq!(history.undo_label(), Some("d"));
    }

    #[test]
    fn zero_depth_records_nothing() {
        let mut world = World::new();
        let node = world.spawn_node(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);

        let mut history = UndoHistory::new(0);
        history.record(&world, "a", &[node]);
        assert!(history.undo(&mut world).is_none());
    }
}
