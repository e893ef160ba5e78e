pub mod hierarchy_components;
pub mod transformation_components;
