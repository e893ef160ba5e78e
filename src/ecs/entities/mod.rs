pub mod entity_types;
