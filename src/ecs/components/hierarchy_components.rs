use legion::Entity;

/// The node this entity is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Immediate children, in the order they were attached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children(pub Vec<Entity>);

/// Marks a node laid out as a UI rect rather than a plain spatial node.
/// Menu entries registered for the `RectTransform` context only accept these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RectLayout;
