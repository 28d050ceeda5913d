//! Ports - abstractions decoupling the learning core from the outside world
//!
//! Two boundaries exist: the [`Simulator`] port toward the remote grid
//! world, and the [`RunObserver`] port toward progress reporting and
//! data collection.

pub mod observer;
pub mod simulator;

pub use observer::RunObserver;
pub use simulator::Simulator;
