//! Application state for the travel globe.
//!
//! [`Planner`] owns the catalog data, the scene and the camera, and exposes
//! one method per user action. Front-ends (the native viewer, tests) drive it
//! and then read the world and camera to draw.

pub mod error;
pub mod planner;
pub mod view;

pub use error::*;
pub use planner::*;
pub use view::*;
