pub mod blackboard;
pub mod domain;
pub mod error;

pub use blackboard::{Blackboard, BlackboardSnapshot};
pub use domain::run::RunStatus;
pub use domain::trip::{AccommodationLevel, TripRequest};
pub use error::{CoreError, Result};
