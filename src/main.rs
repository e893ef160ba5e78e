use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use glam::{EulerRot, Quat, Vec3};
use legion::Entity;
use mimalloc::MiMalloc;
use parking_lot::RwLock;

use reset_without_children::{
    config::ToolConfig,
    ecs::world::World,
    editor::{
        menu_commands::{menu_paths, MenuCommand, MenuContext, ResetChannel},
        Editor,
    },
    logging,
    transform::SceneGraph,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Channel {
    Position,
    Rotation,
    Scale,
    All,
}

impl From<Channel> for ResetChannel {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Position => ResetChannel::Position,
            Channel::Rotation => ResetChannel::Rotation,
            Channel::Scale => ResetChannel::Scale,
            Channel::All => ResetChannel::All,
        }
    }
}

/// Runs one reset command on a small demo hierarchy and logs what the
/// children look like in world space before and after.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON tool config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Channel::All)]
    command: Channel,

    /// Build the demo parent as a UI rect and use the RectTransform menu
    #[arg(long)]
    rect: bool,

    /// Undo the command afterwards
    #[arg(long)]
    undo: bool,

    /// List the registered menu items and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    logging::init(&config.log_filter);

    let world = Arc::new(RwLock::new(World::new()));
    let (parent, children) = build_demo_scene(&mut world.write(), args.rect)?;

    let mut editor = Editor::new(Arc::clone(&world), config);
    if args.list {
        for path in menu_paths() {
            println!("{}", path);
        }
        return Ok(());
    }
    log_children(&world.read(), &children, "before");

    let context = if args.rect {
        MenuContext::RectTransform
    } else {
        MenuContext::Transform
    };
    let command = MenuCommand::new(context, args.command.into());
    if !editor.invoke(&command.path(), Some(parent)) {
        log::warn!("\"{}\" did not run", command.path());
        return Ok(());
    }
    log_children(&world.read(), &children, "after");

    if args.undo && editor.undo().is_some() {
        log_children(&world.read(), &children, "after undo");
    }

    Ok(())
}

// Scaled root, rotated and non-uniformly scaled parent, three children.
fn build_demo_scene(world: &mut World, rect: bool) -> Result<(Entity, Vec<Entity>)> {
    let root = world.spawn_node(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY, Vec3::splat(2.0));

    let parent_rotation = Quat::from_euler(EulerRot::XYZ, 0.0, 30f32.to_radians(), 0.0);
    let parent_scale = Vec3::new(1.0, 2.0, 1.0);
    let parent = if rect {
        world.spawn_rect_node(Vec3::new(10.0, 0.0, 0.0), parent_rotation, parent_scale)
    } else {
        world.spawn_node(Vec3::new(10.0, 0.0, 0.0), parent_rotation, parent_scale)
    };
    world.set_parent(parent, Some(root))?;

    let children = vec![
        world.spawn_child(parent, Vec3::new(5.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE)?,
        world.spawn_child(
            parent,
            Vec3::new(0.0, 1.0, -2.0),
            Quat::from_rotation_x(45f32.to_radians()),
            Vec3::new(0.5, 0.5, 0.5),
        )?,
        world.spawn_child(
            parent,
            Vec3::new(-3.0, 0.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(1.0, 3.0, 1.0),
        )?,
    ];

    Ok((parent, children))
}

fn log_children(world: &World, children: &[Entity], stage: &str) {
    for child in children {
        log::info!(
            "{} {:?}: position {:?}, rotation {:?}, lossy scale {:?}",
            stage,
            child,
            world.position(*child),
            world.rotation(*child),
            world.lossy_scale(*child)
        );
    }
}
