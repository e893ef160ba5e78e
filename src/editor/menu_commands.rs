use dashmap::DashMap;

use crate::{
    ecs::world::World,
    transform::{SceneGraph, TransformCompensator},
};
use legion::Entity;

/// Which local channel(s) of the selected node a command resets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetChannel {
    Position,
    Rotation,
    Scale,
    All,
}

impl ResetChannel {
    pub const EVERY: [ResetChannel; 4] = [
        ResetChannel::Position,
        ResetChannel::Rotation,
        ResetChannel::Scale,
        ResetChannel::All,
    ];

    /// Menu entry name, also used as the undo step label.
    pub fn label(&self) -> &'static str {
        match self {
            ResetChannel::Position => "Reset Position Without Altering Children",
            ResetChannel::Rotation => "Reset Rotation Without Altering Children",
            ResetChannel::Scale => "Reset Scale Without Altering Children",
            ResetChannel::All => "Reset ALL Without Altering Children",
        }
    }

    pub fn apply<G: SceneGraph>(&self, graph: &mut G, parent: G::Node, children: &[G::Node]) {
        match self {
            ResetChannel::Position => TransformCompensator::reset_position(graph, parent, children),
            ResetChannel::Rotation => TransformCompensator::reset_rotation(graph, parent, children),
            ResetChannel::Scale => TransformCompensator::reset_scale(graph, parent, children),
            ResetChannel::All => TransformCompensator::reset_all(graph, parent, children),
        }
    }

    pub fn keeps_position(&self) -> bool {
        matches!(self, ResetChannel::Position | ResetChannel::All)
    }

    pub fn keeps_rotation(&self) -> bool {
        matches!(self, ResetChannel::Rotation | ResetChannel::All)
    }

    pub fn keeps_scale(&self) -> bool {
        matches!(self, ResetChannel::Scale | ResetChannel::All)
    }
}

/// The kind of node a menu entry is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuContext {
    Transform,
    RectTransform,
}

impl MenuContext {
    pub const EVERY: [MenuContext; 2] = [MenuContext::Transform, MenuContext::RectTransform];

    pub fn name(&self) -> &'static str {
        match self {
            MenuContext::Transform => "Transform",
            MenuContext::RectTransform => "RectTransform",
        }
    }

    pub fn accepts(&self, world: &World, entity: Entity) -> bool {
        match self {
            MenuContext::Transform => !world.is_rect(entity),
            MenuContext::RectTransform => world.is_rect(entity),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuCommand {
    pub context: MenuContext,
    pub channel: ResetChannel,
}

impl MenuCommand {
    pub fn new(context: MenuContext, channel: ResetChannel) -> Self {
        MenuCommand { context, channel }
    }

    pub fn path(&self) -> String {
        format!("CONTEXT/{}/{}", self.context.name(), self.channel.label())
    }
}

lazy_static! {
    static ref MENU_ITEMS: DashMap<String, MenuCommand> = DashMap::default();
}

pub fn register_menu_item(command: MenuCommand) {
    MENU_ITEMS.insert(command.path(), command);
}

/// Registers every channel for both node contexts. Safe to call repeatedly.
pub fn register_default_menu_items() {
    for context in MenuContext::EVERY {
        for channel in ResetChannel::EVERY {
            register_menu_item(MenuCommand::new(context, channel));
        }
    }
}

pub fn find_menu_item(path: &str) -> Option<MenuCommand> {
    MENU_ITEMS.get(path).map(|item| *item.value())
}

/// Registered menu paths, sorted.
pub fn menu_paths() -> Vec<String> {
    let mut paths: Vec<String> = MENU_ITEMS.iter().map(|item| item.key().clone()).collect();
    paths.sort();
    paths
}
