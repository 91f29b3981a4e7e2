pub mod queue;
#[allow(clippy::module_inception)]
pub mod tower;

pub use queue::{AircraftQueue, LandingQueue, Priority, TakeoffQueue};
pub use tower::{ControlTower, GateRef, LoadingAircraft};
