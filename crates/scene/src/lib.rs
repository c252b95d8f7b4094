//! What the globe shows: projected markers, route arcs and the orbit camera.

pub mod arc;
pub mod camera;
pub mod components;
pub mod entity;
pub mod picking;
pub mod prefabs;
pub mod world;

pub use arc::*;
pub use camera::*;
pub use entity::*;
pub use picking::*;
pub use world::*;
