//! Domain layer: aggregates, value objects, events, pure services and the
//! ports the application layer talks through.
pub mod aggregates;
pub mod events;
pub mod ports;
pub mod services;
pub mod value_objects;
