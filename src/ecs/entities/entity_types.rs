use crate::ecs::components::{
    hierarchy_components::RectLayout,
    transformation_components::{Position, Rotation, Scale},
};

pub type NodeEntity = (Position, Rotation, Scale);
pub type RectNodeEntity = (Position, Rotation, Scale, RectLayout);
