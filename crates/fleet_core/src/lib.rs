pub mod autopilot;
pub mod clock;
pub mod error;
pub mod executor;
pub mod numeric;
pub mod planner;
pub mod priority;
pub mod routing;
pub mod snapshot;
pub mod spatial;
pub mod traffic;
pub mod twin;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
