//! Adapters implementing the simulator port
//!
//! `TcpSimulator` speaks the remote text protocol; `InMemorySimulator`
//! is a deterministic local world for tests and offline experiments.

pub mod in_memory;
pub mod tcp;
pub mod wire;

pub use in_memory::InMemorySimulator;
pub use tcp::{DriveMode, TcpSimulator};
