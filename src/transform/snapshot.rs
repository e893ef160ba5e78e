use glam::{Quat, Vec3};

use super::scene_graph::SceneGraph;

/// World-space state of one node at capture time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeState {
    pub position: Vec3,
    pub rotation: Quat,
    pub lossy_scale: Vec3,
}

impl NodeState {
    pub fn capture<G: SceneGraph>(graph: &G, node: G::Node) -> Self {
        NodeState {
            position: graph.position(node),
            rotation: graph.rotation(node),
            lossy_scale: graph.lossy_scale(node),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.lossy_scale.is_finite()
    }
}

/// Largest per-channel deviation between two captures of the same nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Drift {
    pub position: f32,
    pub rotation: f32,
    pub scale: f32,
}

/// Pre-mutation world state of a parent and its immediate children.
#[derive(Clone, Debug)]
pub struct Snapshot<N> {
    pub parent: (N, NodeState),
    pub children: Vec<(N, NodeState)>,
}

impl<N: Copy> Snapshot<N> {
    pub fn capture<G: SceneGraph<Node = N>>(graph: &G, parent: N, children: &[N]) -> Self {
        Snapshot {
            parent: (parent, NodeState::capture(graph, parent)),
            children: children
                .iter()
                .map(|&child| (child, NodeState::capture(graph, child)))
                .collect(),
        }
    }

    /// Compares the captured children against their current world state.
    pub fn children_drift<G: SceneGraph<Node = N>>(&self, graph: &G) -> Drift {
        self.children
            .iter()
            .fold(Drift::default(), |drift, (child, before)| {
                let after = NodeState::capture(graph, *child);
                Drift {
                    position: drift
                        .position
                        .max(max_abs(after.position - before.position)),
                    rotation: drift
                        .rotation
                        .max(rotation_distance(after.rotation, before.rotation)),
                    scale: drift
                        .scale
                        .max(max_abs(after.lossy_scale - before.lossy_scale)),
                }
            })
    }
}

fn max_abs(v: Vec3) -> f32 {
    // NaN must not be swallowed by f32::max
    if !v.is_finite() {
        return f32::INFINITY;
    }
    v.abs().max_element()
}

// q and -q are the same orientation
fn rotation_distance(a: Quat, b: Quat) -> f32 {
    if !(a.is_finite() && b.is_finite()) {
        return f32::INFINITY;
    }
    1.0 - a.dot(b).abs().min(1.0)
}
