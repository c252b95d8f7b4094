pub mod bezier;
pub mod easing;
pub mod sphere;
pub mod vec;

pub use bezier::*;
pub use easing::*;
pub use sphere::*;
pub use vec::*;
