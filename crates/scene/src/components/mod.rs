pub mod marker;
pub mod shell;

pub use marker::*;
pub use shell::*;
