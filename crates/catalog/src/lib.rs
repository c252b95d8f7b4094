//! Travel data behind the globe: cities, trips, price alerts and flight search.
//!
//! Everything here is plain data plus pure rules. Storage goes through the
//! [`TravelStore`] trait; only an in-memory implementation exists.

pub mod alert;
pub mod cities;
pub mod error;
pub mod passengers;
pub mod price;
pub mod search;
pub mod store;
pub mod trip;

pub use alert::*;
pub use cities::*;
pub use error::*;
pub use passengers::*;
pub use price::*;
pub use search::*;
pub use store::*;
pub use trip::*;
