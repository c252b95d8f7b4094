//! Frame clock and the event log the planner writes as it changes state.

pub mod event_bus;
pub mod frame;

pub use event_bus::*;
pub use frame::*;
