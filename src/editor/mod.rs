//! Context-menu front end: resolves the selection, checkpoints it and runs
//! the matching reset.

pub mod error;
pub mod menu_commands;
pub mod undo;

use std::sync::Arc;

use legion::Entity;
use parking_lot::RwLock;

use crate::{
    config::ToolConfig,
    ecs::world::World,
    transform::{NodeState, SceneGraph, Snapshot},
};
use error::CommandError;
use menu_commands::{find_menu_item, register_default_menu_items, MenuCommand, MenuContext};
use undo::UndoHistory;

pub struct Editor {
    world: Arc<RwLock<World>>,
    history: UndoHistory<Entity>,
    config: ToolConfig,
}

impl Editor {
    pub fn new(world: Arc<RwLock<World>>, config: ToolConfig) -> Self {
        register_default_menu_items();
        Editor {
            world,
            history: UndoHistory::new(config.undo_depth),
            config,
        }
    }

    pub fn world(&self) -> &Arc<RwLock<World>> {
        &self.world
    }

    pub fn history(&self) -> &UndoHistory<Entity> {
        &self.history
    }

    /// Runs the menu item at `path` on the selection. Returns whether
    /// anything was changed; invalid selections are silently ignored.
    pub fn invoke(&mut self, path: &str, selection: Option<Entity>) -> bool {
        let result = find_menu_item(path)
            .ok_or_else(|| CommandError::UnknownCommand(path.to_string()))
            .and_then(|command| self.run(command, selection));

        match result {
            Ok(()) => true,
            Err(error @ CommandError::UnknownCommand(_)) => {
                log::warn!("{}", error);
                false
            }
            Err(error) => {
                log::debug!("skipping \"{}\": {}", path, error);
                false
            }
        }
    }

    /// Checkpoints the selection and its children, then resets it. The world
    /// stays write-locked for the whole operation.
    pub fn run(
        &mut self,
        command: MenuCommand,
        selection: Option<Entity>,
    ) -> Result<(), CommandError> {
        let mut world = self.world.write();
        let target = resolve_target(&world, command.context, selection)?;

        let children = world.children(target);
        let mut nodes = Vec::with_capacity(children.len() + 1);
        nodes.push(target);
        nodes.extend_from_slice(&children);
        self.history.record(&*world, command.channel.label(), &nodes);

        let snapshot = Snapshot::capture(&*world, target, &children);
        command.channel.apply(&mut *world, target, &children);

        log::info!(
            "{} on {:?} ({} children)",
            command.channel.label(),
            target,
            children.len()
        );
        self.check_children(&world, command, &snapshot);
        Ok(())
    }

    pub fn undo(&mut self) -> Option<String> {
        let mut world = self.world.write();
        let label = self.history.undo(&mut *world);
        if let Some(label) = &label {
            log::info!("undo {}", label);
        }
        label
    }

    pub fn redo(&mut self) -> Option<String> {
        let mut world = self.world.write();
        let label = self.history.redo(&mut *world);
        if let Some(label) = &label {
            log::info!("redo {}", label);
        }
        label
    }

    // Reports, never corrects.
    fn check_children(
        &self,
        world: &World,
        command: MenuCommand,
        snapshot: &Snapshot<Entity>,
    ) {
        let (parent, parent_before) = snapshot.parent;
        let parent_after = NodeState::capture(world, parent);
        log::debug!(
            "{:?} moved by {:?} in world space",
            parent,
            parent_after.position - parent_before.position
        );

        let drift = snapshot.children_drift(world);
        let tolerance = self.config.drift_tolerance;
        let channel = command.channel;

        if channel.keeps_position() && drift.position > tolerance {
            log::warn!(
                "children moved by up to {} after {}",
                drift.position,
                channel.label()
            );
        }
        if channel.keeps_rotation() && drift.rotation > tolerance {
            log::warn!(
                "children rotated by up to {} after {}",
                drift.rotation,
                channel.label()
            );
        }
        if channel.keeps_scale() && drift.scale > tolerance {
            log::warn!(
                "children lossy scale off by up to {} after {}, \
                 rotated hierarchies are only approximated",
                drift.scale,
                channel.label()
            );
        }

        for (child, _) in &snapshot.children {
            let finite = NodeState::capture(world, *child).is_finite()
                && world.local_scale(*child).is_finite();
            if !finite {
                log::warn!(
                    "{:?} ended up with non-finite values, an ancestor has zero scale",
                    child
                );
            }
        }
    }
}

fn resolve_target(
    world: &World,
    context: MenuContext,
    selection: Option<Entity>,
) -> Result<Entity, CommandError> {
    let entity =
        selection.ok_or_else(|| CommandError::InvalidTarget("nothing selected".to_string()))?;

    if !world.contains(entity) {
        return Err(CommandError::InvalidTarget(format!("{:?} no longer exists", entity)));
    }
    if !world.has_transform(entity) {
        return Err(CommandError::InvalidTarget(format!("{:?} has no transform", entity)));
    }
    if !context.accepts(world, entity) {
        return Err(CommandError::InvalidTarget(format!(
            "{:?} is not a {}",
            entity,
            context.name()
        )));
    }

    Ok(entity)
}
